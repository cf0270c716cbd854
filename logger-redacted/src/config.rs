// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Redact member IDs, SSNs, phones and emails before they reach a sink
    pub redaction_enabled: bool,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json: bool,
    /// Default filter directive, overridden by RUST_LOG
    pub log_level: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            redaction_enabled: true,
            json: false,
            log_level: "info".to_string(),
        }
    }
}
