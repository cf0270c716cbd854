use error_common::{codes, EngineError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration source not found: {0}")]
    SourceNotFound(String),

    #[error("Unsupported configuration format: {0} (expected .yaml, .yml or .toml)")]
    UnsupportedFormat(String),

    #[error("Configuration parsing failed: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::ValidationError(_) => codes::config::VALIDATION_FAILED,
            _ => codes::config::LOAD_FAILED,
        };
        EngineError::config(code, err.to_string())
    }
}
