pub mod api; // HTTP surface
pub mod config;
pub mod domains; // Heart + sleep field catalogues, rules, ranges
pub mod intelligence; // Assessment pipeline
pub mod models;
pub mod predictor; // Classifier artifacts and load-once registry

#[cfg(test)]
mod fixtures;

use tracing_subscriber::EnvFilter;

use crate::api::server::ServerError;
use crate::config::AppConfig;

pub fn run() -> Result<(), ServerError> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over RISKSCOPE_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log_filter))
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(api::server::serve(&config))
}
