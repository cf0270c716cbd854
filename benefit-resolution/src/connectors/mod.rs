//! Secondary-source connectors.
//!
//! A connector receives one [`RetrievalJob`] and returns whatever subset of
//! the requested fields it could recover. A missing key means "not
//! recovered"; only transport-level problems are errors, and those are
//! captured on the job by the dispatcher rather than propagated.

pub mod http;
pub mod manual_script;
pub mod simulated;

pub use http::HttpSourceConnector;
pub use manual_script::ManualScriptConnector;
pub use simulated::{SimulatedDocumentConnector, SimulatedPortalConnector};

use crate::error::{ResolutionError, ResolutionResult};
use crate::jobs::{FieldValues, RetrievalJob};
use crate::models::RetrievalMethod;
use crate::registry::FieldRegistry;
use async_trait::async_trait;
use config_engine::{ConnectorSettings, ConnectorsSettings};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Secondary source unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from secondary source: {0}")]
    InvalidResponse(String),
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// One secondary recovery capability
#[async_trait]
pub trait SecondarySource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// The method this connector serves
    fn method(&self) -> RetrievalMethod;

    /// Recover as many of `job.fields_requested` as possible
    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues>;
}

/// Connectors keyed by the method they serve
#[derive(Clone, Default)]
pub struct ConnectorRegistry {
    connectors: HashMap<RetrievalMethod, Arc<dyn SecondarySource>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under its own method, replacing any previous one.
    pub fn register(&mut self, connector: Arc<dyn SecondarySource>) -> &mut Self {
        self.connectors.insert(connector.method(), connector);
        self
    }

    pub fn with(mut self, connector: Arc<dyn SecondarySource>) -> Self {
        self.register(connector);
        self
    }

    pub fn get(&self, method: RetrievalMethod) -> Option<Arc<dyn SecondarySource>> {
        self.connectors.get(&method).cloned()
    }

    pub fn contains(&self, method: RetrievalMethod) -> bool {
        self.connectors.contains_key(&method)
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Build every configured connector. Disabled methods are left unregistered.
    pub fn from_settings(
        settings: &ConnectorsSettings,
        registry: &Arc<FieldRegistry>,
    ) -> ResolutionResult<Self> {
        let mut connectors = Self::new();
        let configured = [
            (RetrievalMethod::PortalScrape, &settings.portal_scrape),
            (RetrievalMethod::DocumentAnalysis, &settings.document_analysis),
            (RetrievalMethod::ManualScript, &settings.manual_script),
        ];

        for (method, connector_settings) in configured {
            match create_connector(method, connector_settings, registry)? {
                Some(connector) => {
                    info!(method = %method, connector = connector.name(), "Connector registered");
                    connectors.register(connector);
                }
                None => info!(method = %method, "Connector disabled"),
            }
        }

        Ok(connectors)
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(String, String)> = self
            .connectors
            .iter()
            .map(|(method, connector)| (method.to_string(), connector.name().to_string()))
            .collect();
        entries.sort();
        f.debug_map().entries(entries).finish()
    }
}

/// Create a connector instance for `method` based on configuration.
///
/// Returns `Ok(None)` for a disabled method.
pub fn create_connector(
    method: RetrievalMethod,
    settings: &ConnectorSettings,
    registry: &Arc<FieldRegistry>,
) -> ResolutionResult<Option<Arc<dyn SecondarySource>>> {
    let connector: Arc<dyn SecondarySource> = match (method, settings) {
        (_, ConnectorSettings::Disabled) => return Ok(None),
        (RetrievalMethod::PortalScrape, ConnectorSettings::Simulated) => {
            Arc::new(SimulatedPortalConnector::new())
        }
        (RetrievalMethod::DocumentAnalysis, ConnectorSettings::Simulated) => {
            Arc::new(SimulatedDocumentConnector::new())
        }
        (RetrievalMethod::ManualScript, ConnectorSettings::Script) => {
            Arc::new(ManualScriptConnector::new(Arc::clone(registry)))
        }
        (_, ConnectorSettings::Http { endpoint, api_key }) => {
            let connector = HttpSourceConnector::new(method, endpoint, api_key.clone())?;
            info!(method = %method, endpoint = connector.endpoint(), "HTTP connector configured");
            Arc::new(connector)
        }
        (method, settings) => {
            return Err(ResolutionError::ConnectorSetup(format!(
                "connector kind '{}' cannot serve {}",
                settings.kind(),
                method
            )))
        }
    };
    Ok(Some(connector))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<FieldRegistry> {
        Arc::new(FieldRegistry::builtin().unwrap())
    }

    #[test]
    fn test_default_settings_register_all_methods() {
        let connectors = ConnectorRegistry::from_settings(&ConnectorsSettings::default(), &registry()).unwrap();
        assert_eq!(connectors.len(), 3);
        for method in RetrievalMethod::DISPATCH_ORDER {
            assert_eq!(connectors.get(method).unwrap().method(), method);
        }
    }

    #[test]
    fn test_disabled_method_not_registered() {
        let settings = ConnectorsSettings {
            document_analysis: ConnectorSettings::Disabled,
            ..ConnectorsSettings::default()
        };
        let connectors = ConnectorRegistry::from_settings(&settings, &registry()).unwrap();
        assert!(!connectors.contains(RetrievalMethod::DocumentAnalysis));
        assert_eq!(connectors.len(), 2);
    }

    #[test]
    fn test_mismatched_kind_rejected() {
        let err = create_connector(RetrievalMethod::ManualScript, &ConnectorSettings::Simulated, &registry())
            .err()
            .unwrap();
        assert!(matches!(err, ResolutionError::ConnectorSetup(_)));

        assert!(create_connector(RetrievalMethod::PortalScrape, &ConnectorSettings::Script, &registry()).is_err());
    }

    #[test]
    fn test_http_kind_builds_for_any_method() {
        let settings = ConnectorSettings::Http {
            endpoint: "http://localhost:9400/retrieve".to_string(),
            api_key: None,
        };
        let connector = create_connector(RetrievalMethod::DocumentAnalysis, &settings, &registry())
            .unwrap()
            .unwrap();
        assert_eq!(connector.method(), RetrievalMethod::DocumentAnalysis);
        assert_eq!(connector.name(), "http");
    }
}
