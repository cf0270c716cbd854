use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Full engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dispatch: DispatchSettings,
    pub registry: RegistrySettings,
    pub connectors: ConnectorsSettings,
    pub logging: LoggerConfig,
}

/// Secondary retrieval timing and concurrency
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Upper bound for the whole dispatch phase
    pub global_deadline_ms: u64,
    /// Upper bound for a single connector call
    pub job_timeout_ms: u64,
    /// Jobs allowed in flight at once
    pub max_concurrent_jobs: usize,
}

impl DispatchSettings {
    pub fn global_deadline(&self) -> Duration {
        Duration::from_millis(self.global_deadline_ms)
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_millis(self.job_timeout_ms)
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            global_deadline_ms: 30_000,
            job_timeout_ms: 10_000,
            max_concurrent_jobs: 4,
        }
    }
}

/// Where the field registry comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Registry YAML file; the built-in dental registry is used when absent
    pub path: Option<PathBuf>,
}

/// How a single secondary source is reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectorSettings {
    /// Built-in fixture data (demo / staging)
    Simulated,
    /// JSON-over-HTTP secondary backend
    Http {
        endpoint: String,
        api_key: Option<String>,
    },
    /// Pre-filled call script for front desk staff
    Script,
    /// No connector; jobs for this method fail
    Disabled,
}

impl ConnectorSettings {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Http { .. } => "http",
            Self::Script => "script",
            Self::Disabled => "disabled",
        }
    }
}

/// One connector per retrieval method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorsSettings {
    pub portal_scrape: ConnectorSettings,
    pub document_analysis: ConnectorSettings,
    pub manual_script: ConnectorSettings,
}

impl Default for ConnectorsSettings {
    fn default() -> Self {
        Self {
            portal_scrape: ConnectorSettings::Simulated,
            document_analysis: ConnectorSettings::Simulated,
            manual_script: ConnectorSettings::Script,
        }
    }
}
