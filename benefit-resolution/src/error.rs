use error_common::{codes, EngineError};
use thiserror::Error;

/// Registry definition rejected at load time. Always fatal at startup.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read registry file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported registry version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Registry '{0}' defines no fields")]
    Empty(String),

    #[error("Duplicate field path in registry: {0}")]
    DuplicatePath(String),

    #[error("Unknown benefit field path: {0}")]
    UnknownField(String),

    #[error("Field {0} has an empty procedure matcher")]
    EmptyMatcher(String),
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Malformed eligibility document: {0}")]
    MalformedDocument(String),

    #[error("Connector setup error: {0}")]
    ConnectorSetup(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;

impl From<RegistryError> for EngineError {
    fn from(err: RegistryError) -> Self {
        let code = match &err {
            RegistryError::DuplicatePath(_) => codes::registry::DUPLICATE_PATH,
            RegistryError::UnknownField(_) => codes::registry::UNKNOWN_FIELD,
            RegistryError::UnsupportedVersion { .. } => codes::registry::UNSUPPORTED_VERSION,
            RegistryError::Parse(_)
            | RegistryError::Io { .. }
            | RegistryError::Empty(_)
            | RegistryError::EmptyMatcher(_) => codes::registry::INVALID_DEFINITION,
        };
        EngineError::registry(code, err.to_string())
    }
}

impl From<ResolutionError> for EngineError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::Registry(inner) => inner.into(),
            ResolutionError::MalformedDocument(message) => {
                EngineError::input(codes::input::MALFORMED_DOCUMENT, message)
            }
            ResolutionError::ConnectorSetup(message) => {
                EngineError::connector(codes::connector::UNAVAILABLE, message)
            }
            ResolutionError::Network(e) => {
                EngineError::connector(codes::connector::FAILED, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_codes() {
        let err: EngineError = RegistryError::DuplicatePath("deductible_met".to_string()).into();
        assert_eq!(err.code(), codes::registry::DUPLICATE_PATH);
        assert!(err.is_startup_fatal());
    }

    #[test]
    fn test_malformed_document_is_input_error() {
        let err: EngineError =
            ResolutionError::MalformedDocument("root is a string".to_string()).into();
        assert_eq!(err.code(), codes::input::MALFORMED_DOCUMENT);
        assert!(!err.is_startup_fatal());
    }
}
