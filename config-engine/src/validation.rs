// Configuration validation, run once after every load
use crate::error::{ConfigError, Result};
use crate::settings::{ConnectorSettings, EngineConfig};

pub trait ConfigValidator {
    fn validate(&self) -> Result<()>;
}

impl ConfigValidator for EngineConfig {
    fn validate(&self) -> Result<()> {
        let dispatch = &self.dispatch;
        if dispatch.global_deadline_ms == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.global_deadline_ms must be greater than zero".to_string(),
            ));
        }
        if dispatch.job_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.job_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if dispatch.job_timeout_ms > dispatch.global_deadline_ms {
            return Err(ConfigError::ValidationError(format!(
                "dispatch.job_timeout_ms ({}) exceeds dispatch.global_deadline_ms ({})",
                dispatch.job_timeout_ms, dispatch.global_deadline_ms
            )));
        }
        if dispatch.max_concurrent_jobs == 0 {
            return Err(ConfigError::ValidationError(
                "dispatch.max_concurrent_jobs must be at least 1".to_string(),
            ));
        }

        let connectors = &self.connectors;
        validate_automated("connectors.portal_scrape", &connectors.portal_scrape)?;
        validate_automated("connectors.document_analysis", &connectors.document_analysis)?;
        match &connectors.manual_script {
            ConnectorSettings::Simulated => {
                return Err(ConfigError::ValidationError(
                    "connectors.manual_script: kind 'simulated' is not supported, use 'script'".to_string(),
                ))
            }
            settings => validate_endpoint("connectors.manual_script", settings)?,
        }

        Ok(())
    }
}

fn validate_automated(key: &str, settings: &ConnectorSettings) -> Result<()> {
    if *settings == ConnectorSettings::Script {
        return Err(ConfigError::ValidationError(format!(
            "{key}: kind 'script' is only valid for manual_script"
        )));
    }
    validate_endpoint(key, settings)
}

fn validate_endpoint(key: &str, settings: &ConnectorSettings) -> Result<()> {
    if let ConnectorSettings::Http { endpoint, .. } = settings {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "{key}.endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
    }
    Ok(())
}
