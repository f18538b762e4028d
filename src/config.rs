use crate::error::{ReportBuilderError, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable holding the Gemini API credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

const REGISTRY_PATH_VAR: &str = "REPORT_REGISTRY_PATH";
const REFERENCE_IMAGE_VAR: &str = "REPORT_REFERENCE_IMAGE";
const MODEL_ID_VAR: &str = "REPORT_MODEL_ID";

pub const DEFAULT_REGISTRY_PATH: &str = "customer_report_updated.csv";
pub const DEFAULT_REFERENCE_IMAGE_PATH: &str = "image.png";
pub const DEFAULT_MODEL_ID: &str = "gemini-3-pro-image-preview";

/// Application settings resolved once at startup.
///
/// Only the API credential is required; everything else falls back to the
/// production defaults. A missing or blank credential is a fatal
/// [`ReportBuilderError::Configuration`] so callers can halt with a visible
/// message instead of failing mid-session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub registry_path: PathBuf,
    pub reference_image_path: PathBuf,
    pub model_id: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                ReportBuilderError::Configuration(format!(
                    "{} is not set; add it to the environment or a .env file",
                    API_KEY_VAR
                ))
            })?;

        Ok(Self {
            api_key,
            registry_path: env_or_default(REGISTRY_PATH_VAR, DEFAULT_REGISTRY_PATH).into(),
            reference_image_path: env_or_default(REFERENCE_IMAGE_VAR, DEFAULT_REFERENCE_IMAGE_PATH)
                .into(),
            model_id: env_or_default(MODEL_ID_VAR, DEFAULT_MODEL_ID),
        })
    }
}

fn env_or_default(var: &str, default: &str) -> String {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
