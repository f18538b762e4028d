use crate::error::{ReportBuilderError, Result};
use crate::position::{classify, Position};
use crate::prompt::build_report_prompt;
use crate::registry::{IdentityInput, PlayerRecord, Registry};
use log::{debug, info};
use std::future::Future;

/// Team assigned when the matched record has no team of its own.
pub const DEFAULT_TEAM: &str = "SSG 랜더스";

/// The two steps of the report flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    /// Step 1: collect and validate identity credentials.
    #[default]
    Identity,
    /// Step 2: show the generated report.
    Report,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::Identity => 1,
            Step::Report => 2,
        }
    }
}

/// Everything derived from a successful identity match.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub record: PlayerRecord,
    pub team: String,
    pub name: String,
    pub account_number: String,
    /// Last two digits of the account number.
    pub jersey_number: String,
    pub position: Position,
}

/// Per-session state, owned by the caller and passed through each flow
/// operation. There are no globals; discarding the value discards the
/// session.
#[derive(Debug, Default)]
pub struct SessionState {
    step: Step,
    profile: Option<PlayerProfile>,
    report_image: Option<Vec<u8>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    pub fn report_image(&self) -> Option<&[u8]> {
        self.report_image.as_deref()
    }

    /// True when entering the report step will have to invoke the renderer.
    pub fn needs_report(&self) -> bool {
        self.step == Step::Report && self.report_image.is_none()
    }

    /// Step 1 submission: validate, look up, derive, advance.
    ///
    /// Invalid input and lookup misses leave the session in the identity
    /// step; a previously cached report image survives a re-submission, so
    /// re-entering the report step does not re-invoke the remote service.
    pub fn submit_identity(
        &mut self,
        registry: &Registry,
        name: &str,
        account_number: &str,
    ) -> Result<&PlayerProfile> {
        let identity = IdentityInput::parse(name, account_number)?;
        let record = registry.find(&identity)?;

        let team = record
            .team
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TEAM)
            .to_string();
        let position = classify(&record);

        info!(
            "player '{}' registered with {} as {}",
            identity.name(),
            team,
            position
        );

        let profile = PlayerProfile {
            team,
            name: identity.name().to_string(),
            account_number: identity.account_number().to_string(),
            jersey_number: identity.jersey_number().to_string(),
            position,
            record,
        };

        self.step = Step::Report;
        Ok(&*self.profile.insert(profile))
    }

    /// Step 2 entry: return the report image, rendering it on first entry.
    ///
    /// `render` receives the built prompt and must always produce usable
    /// image bytes (the service adapter's contract). It is invoked at most
    /// once per session: once bytes are cached they are returned as-is.
    pub async fn ensure_report<F, Fut>(&mut self, render: F) -> Result<&[u8]>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Vec<u8>>,
    {
        if self.step != Step::Report {
            return Err(ReportBuilderError::NoActivePlayer);
        }

        if self.report_image.is_none() {
            let profile = self
                .profile
                .as_ref()
                .ok_or(ReportBuilderError::NoActivePlayer)?;
            let prompt = build_report_prompt(profile);
            debug!("rendering report image for '{}'", profile.name);
            let bytes = render(prompt).await;
            self.report_image = Some(bytes);
        } else {
            debug!("reusing cached report image");
        }

        self.report_image
            .as_deref()
            .ok_or(ReportBuilderError::NoActivePlayer)
    }

    /// Navigate one step back. Matched data and any cached image are kept.
    pub fn back(&mut self) {
        self.step = Step::Identity;
    }

    /// Full reset: consumes the session and yields a fresh one.
    #[must_use]
    pub fn reset(self) -> Self {
        Self::default()
    }
}
