use crate::codes;
use thiserror::Error;

/// Top-level error for binaries and crate boundaries.
///
/// Library crates keep their own precise error enums and convert into this
/// one at the edge, so a binary only ever has one error type to report.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Field registry definition rejected at load time
    #[error("Registry error [{code}]: {message}")]
    Registry { code: &'static str, message: String },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error [{code}]: {message}")]
    Config { code: &'static str, message: String },

    /// Caller supplied input that cannot be processed at all
    #[error("Input error [{code}]: {message}")]
    Input { code: &'static str, message: String },

    /// Secondary-source connector could not be constructed
    #[error("Connector error [{code}]: {message}")]
    Connector { code: &'static str, message: String },

    /// IO errors (reading documents, config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub fn registry(code: &'static str, message: impl Into<String>) -> Self {
        Self::Registry { code, message: message.into() }
    }

    pub fn config(code: &'static str, message: impl Into<String>) -> Self {
        Self::Config { code, message: message.into() }
    }

    pub fn input(code: &'static str, message: impl Into<String>) -> Self {
        Self::Input { code, message: message.into() }
    }

    pub fn connector(code: &'static str, message: impl Into<String>) -> Self {
        Self::Connector { code, message: message.into() }
    }

    /// Stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Registry { code, .. }
            | Self::Config { code, .. }
            | Self::Input { code, .. }
            | Self::Connector { code, .. } => code,
            Self::Io(_) => codes::system::IO,
            Self::Serialization(_) => codes::system::SERIALIZATION,
        }
    }

    /// Coarse category used in structured logs
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Registry { .. } => "registry",
            Self::Config { .. } => "config",
            Self::Input { .. } => "input",
            Self::Connector { .. } => "connector",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }

    /// True for errors that must stop the process before any request is served
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Self::Registry { .. } | Self::Config { .. } | Self::Connector { .. })
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Log an error with its code and category
pub fn log_error(context: &str, error: &EngineError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error_type = error.error_type(),
        error = %error,
        "Benefit engine error occurred"
    );
}
