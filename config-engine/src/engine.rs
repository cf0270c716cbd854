use crate::error::Result;
use crate::providers::{with_env, with_file};
use crate::settings::EngineConfig;
use crate::validation::ConfigValidator;
use figment::providers::Serialized;
use figment::Figment;
use std::path::Path;
use tracing::{debug, info};

/// Loads and validates [`EngineConfig`].
///
/// Layering, lowest to highest precedence: compiled defaults, the optional
/// configuration file, `BENEFIT_*` environment variables.
pub struct ConfigEngine;

impl ConfigEngine {
    pub fn load(path: Option<&Path>) -> Result<EngineConfig> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

        if let Some(path) = path {
            debug!(path = %path.display(), "Layering configuration file");
            figment = with_file(figment, path)?;
        }

        let config: EngineConfig = with_env(figment).extract()?;
        config.validate()?;

        info!(
            global_deadline_ms = config.dispatch.global_deadline_ms,
            job_timeout_ms = config.dispatch.job_timeout_ms,
            max_concurrent_jobs = config.dispatch.max_concurrent_jobs,
            portal_scrape = config.connectors.portal_scrape.kind(),
            document_analysis = config.connectors.document_analysis.kind(),
            manual_script = config.connectors.manual_script.kind(),
            "Configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ConnectorSettings;
    use crate::ConfigError;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ConfigEngine::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.dispatch.max_concurrent_jobs, 4);
            assert_eq!(config.connectors.manual_script, ConnectorSettings::Script);
            assert!(config.registry.path.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "engine.yaml",
                r#"
dispatch:
  global_deadline_ms: 20000
  job_timeout_ms: 8000
connectors:
  document_analysis:
    kind: http
    endpoint: "https://docs.internal/extract"
"#,
            )?;
            jail.set_env("BENEFIT_DISPATCH__JOB_TIMEOUT_MS", "5000");

            let config = ConfigEngine::load(Some(Path::new("engine.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.dispatch.global_deadline_ms, 20_000);
            assert_eq!(config.dispatch.job_timeout_ms, 5_000);
            assert_eq!(
                config.connectors.document_analysis,
                ConnectorSettings::Http {
                    endpoint: "https://docs.internal/extract".to_string(),
                    api_key: None,
                }
            );
            assert_eq!(config.connectors.portal_scrape, ConnectorSettings::Simulated);
            Ok(())
        });
    }

    #[test]
    fn test_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "engine.toml",
                r#"
[dispatch]
max_concurrent_jobs = 2

[connectors.portal_scrape]
kind = "disabled"
"#,
            )?;

            let config = ConfigEngine::load(Some(Path::new("engine.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.dispatch.max_concurrent_jobs, 2);
            assert_eq!(config.connectors.portal_scrape, ConnectorSettings::Disabled);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = ConfigEngine::load(Some(Path::new("absent.yaml"))).unwrap_err();
            assert!(matches!(err, ConfigError::SourceNotFound(_)));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        Jail::expect_with(|jail| {
            jail.set_env("BENEFIT_DISPATCH__MAX_CONCURRENT_JOBS", "0");
            let err = ConfigEngine::load(None).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)));
            Ok(())
        });
    }
}
