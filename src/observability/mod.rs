use thiserror::Error;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Failed to initialize tracing subscriber: {message}")]
    InitError { message: String },
}

/// Initializes structured logging for the application.
///
/// The filter honours `RUST_LOG` when set, otherwise falls back to the
/// configured log level. JSON output is opt-in for production log
/// aggregation; local development gets the human readable format.
pub fn init_observability(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.enable_json_logging {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| ObservabilityError::InitError {
        message: e.to_string(),
    })?;

    info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = config.enable_json_logging,
        "Observability initialized"
    );

    Ok(())
}
