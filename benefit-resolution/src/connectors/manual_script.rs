// Last resort: a pre-filled call script for front desk staff.
// No automated data comes back, so every requested field stays missing.
use super::{ConnectorResult, SecondarySource};
use crate::jobs::{FieldValues, RetrievalJob};
use crate::models::RetrievalMethod;
use crate::registry::FieldRegistry;
use async_trait::async_trait;
use logger_redacted::redacted_warn;
use std::sync::Arc;

const RULE: &str = "------------------------------------------------------------";

pub struct ManualScriptConnector {
    registry: Arc<FieldRegistry>,
}

impl ManualScriptConnector {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self { registry }
    }

    /// Render the call script for a job
    pub fn script(&self, job: &RetrievalJob) -> String {
        let paths: Vec<&str> = job.fields_requested.iter().map(|f| f.path()).collect();

        let mut lines = vec![
            RULE.to_string(),
            format!("MANUAL CALL SCRIPT: job {}", job.short_id()),
            format!("Carrier:   {}", job.identity.carrier),
            format!("Member ID: {}", job.identity.member_id),
            format!("Ask for:   {}", paths.join(", ")),
            RULE.to_string(),
            "Sample script:".to_string(),
            "  'Hi, this is [Office Name] calling to verify benefits for member".to_string(),
            format!("   {}. I need to confirm the following:", job.identity.member_id),
        ];
        lines.extend(job.fields_requested.iter().map(|field| {
            let label = self
                .registry
                .get(*field)
                .map_or_else(|| field.path().to_string(), |d| d.label.clone());
            format!("   - {label}")
        }));

        let mut script = lines.join("\n");
        script.push_str("'\n");
        script
    }
}

#[async_trait]
impl SecondarySource for ManualScriptConnector {
    fn name(&self) -> &str {
        "call-script"
    }

    fn method(&self) -> RetrievalMethod {
        RetrievalMethod::ManualScript
    }

    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        redacted_warn!("{}", self.script(job));
        Ok(FieldValues::new())
    }
}
