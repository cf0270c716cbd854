use error_common::{codes, EngineError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to install tracing subscriber: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, LoggerError>;

impl From<LoggerError> for EngineError {
    fn from(err: LoggerError) -> Self {
        EngineError::config(codes::config::LOAD_FAILED, err.to_string())
    }
}
