//! # Investment Report Builder
//!
//! A library for turning rows of a customer registry into personalized,
//! AI-generated "baseball card" investment reports.
//!
//! ## Core Concepts
//!
//! - **Registry**: a CSV table of players keyed by name + 12-digit account
//!   number, carrying five investment metrics, three headline stats, and
//!   three ranked stock picks
//! - **Position**: a label derived from the five metrics by a deterministic
//!   argmax (first-defined label wins ties)
//! - **Report prompt**: a fixed multi-section template describing the card
//!   layout, interpolated with the player's values
//! - **Session flow**: a two-step state machine (identity → report) that
//!   caches the generated image so the remote model is called at most once
//!   per session
//! - **Graceful degradation**: report generation always yields usable image
//!   bytes; failures substitute a fixed solid-color placeholder
//!
//! ## Example
//!
//! ```rust,ignore
//! use investment_report_builder::*;
//!
//! let registry = Registry::new("customer_report_updated.csv");
//! let mut session = SessionState::new();
//!
//! let profile = session.submit_identity(&registry, "Kim MinJae", "123456789012")?;
//! println!("{} plays as {}", profile.name, profile.position);
//!
//! // Requires the "gemini" feature:
//! let config = AppConfig::from_env()?;
//! let service = ReportImageService::from_config(&config);
//! let bytes = session
//!     .ensure_report(|prompt| async move {
//!         service.generate_report_image(&prompt).await.bytes
//!     })
//!     .await?;
//! std::fs::write("yipp_report_12.png", bytes)?;
//! ```

pub mod config;
pub mod error;
pub mod position;
pub mod prompt;
pub mod registry;
pub mod session;

#[cfg(feature = "gemini")]
pub mod report;

pub use config::AppConfig;
pub use error::{ReportBuilderError, Result};
pub use position::{classify, classify_strict, Position};
pub use prompt::{build_report_prompt, profile_summary, THEME_COLOR_HEX};
pub use registry::{IdentityInput, PlayerRecord, Registry, ACCOUNT_NUMBER_LEN};
pub use session::{PlayerProfile, SessionState, Step, DEFAULT_TEAM};

#[cfg(feature = "gemini")]
pub use report::{
    fallback_report_image, GeminiClient, ReportImageService, ReportOutcome, FALLBACK_FILL,
    FALLBACK_HEIGHT, FALLBACK_WIDTH,
};
