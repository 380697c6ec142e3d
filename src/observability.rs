//! Tracing initialization

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Initialize the JSON tracing subscriber
///
/// The configured log level acts as the default filter; `RUST_LOG`-style
/// directives in the level string are honored as-is.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_new(&config.service.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Tracing initialized for service: {}", config.service.name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_with_defaults() {
        let config = Config::default();
        // This should not panic
        let _ = init_tracing(&config);
    }
}
