use crate::config::types::{Config, HttpConfig, TraceConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_trace_config(&config.trace)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates traversal defaults
fn validate_trace_config(config: &TraceConfig) -> Result<(), ConfigError> {
    if config.snapshot.trim().is_empty() {
        return Err(ConfigError::Validation(
            "snapshot path cannot be empty".to_string(),
        ));
    }

    if let Some(output) = &config.output {
        if output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}
