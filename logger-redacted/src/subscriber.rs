use crate::config::LoggerConfig;
use crate::error::{LoggerError, Result};
use crate::redactor::set_redaction_enabled;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Output goes to
/// stderr so that binaries can keep stdout for their JSON results.
pub fn init_tracing(config: &LoggerConfig) -> Result<()> {
    set_redaction_enabled(config.redaction_enabled);

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| LoggerError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| LoggerError::Init(e.to_string()))
}
