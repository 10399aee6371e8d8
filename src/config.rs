use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "RiskScope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model artifact names; files are `<name>-v<version>.json`.
pub const HEART_ARTIFACT: &str = "heart_logistic_regression";
pub const SLEEP_ARTIFACT: &str = "sleep_adaboost";
pub const MODEL_VERSION: &str = "1";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

const DEFAULT_LOG_FILTER: &str = "riskscope_lib=info,tower_http=info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Cannot determine home directory; set RISKSCOPE_MODELS_DIR")]
    NoHomeDir,
}

/// Runtime configuration resolved from `RISKSCOPE_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub models_dir: PathBuf,
    /// Directory holding `heart_content.json` / `sleep_content.json`
    /// overrides. Bundled content is used when unset.
    pub content_dir: Option<PathBuf>,
    pub heart_model_sha256: Option<String>,
    pub sleep_model_sha256: Option<String>,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_raw = get("RISKSCOPE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: "RISKSCOPE_BIND",
            value: bind_raw.clone(),
        })?;

        let models_dir = match get("RISKSCOPE_MODELS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_models_dir().ok_or(ConfigError::NoHomeDir)?,
        };

        let heart_model_sha256 = get("RISKSCOPE_HEART_MODEL_SHA256")
            .map(|d| check_digest("RISKSCOPE_HEART_MODEL_SHA256", d))
            .transpose()?;
        let sleep_model_sha256 = get("RISKSCOPE_SLEEP_MODEL_SHA256")
            .map(|d| check_digest("RISKSCOPE_SLEEP_MODEL_SHA256", d))
            .transpose()?;

        Ok(Self {
            bind,
            models_dir,
            content_dir: get("RISKSCOPE_CONTENT_DIR").map(PathBuf::from),
            heart_model_sha256,
            sleep_model_sha256,
            log_filter: get("RISKSCOPE_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn check_digest(var: &'static str, digest: String) -> Result<String, ConfigError> {
    let lower = digest.to_lowercase();
    if lower.len() == 64 && lower.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(lower)
    } else {
        Err(ConfigError::InvalidValue { var, value: digest })
    }
}

/// Get the application data directory
/// ~/RiskScope/ on all platforms
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Default model artifact directory
pub fn default_models_dir() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("models"))
}

/// Log filter used when neither `RUST_LOG` nor `RISKSCOPE_LOG` is set.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}
