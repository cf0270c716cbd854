//! JSON-over-HTTP secondary backend
//!
//! The job is POSTed to the configured endpoint; the backend answers with
//! `{ "fields": { "<dotted path>": <value>, ... } }`. Paths the engine does
//! not track are ignored.
use super::{ConnectorError, ConnectorResult, SecondarySource};
use crate::error::ResolutionResult;
use crate::jobs::{FieldValues, RetrievalJob};
use crate::models::RetrievalMethod;
use crate::registry::BenefitField;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct RetrievalRequest<'a> {
    job_id: Uuid,
    method: RetrievalMethod,
    patient_id: &'a str,
    carrier: &'a str,
    member_id: &'a str,
    fields: &'a [BenefitField],
}

#[derive(Debug, Deserialize)]
struct RetrievalResponse {
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

pub struct HttpSourceConnector {
    method: RetrievalMethod,
    endpoint: String,
    api_key: Option<String>,
    http_client: HttpClient,
}

impl HttpSourceConnector {
    pub fn new(
        method: RetrievalMethod,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> ResolutionResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("benefit-resolution/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            method,
            endpoint: endpoint.into(),
            api_key,
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SecondarySource for HttpSourceConnector {
    fn name(&self) -> &str {
        "http"
    }

    fn method(&self) -> RetrievalMethod {
        self.method
    }

    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        let body = RetrievalRequest {
            job_id: job.job_id,
            method: job.method,
            patient_id: &job.identity.patient_id,
            carrier: &job.identity.carrier,
            member_id: &job.identity.member_id,
            fields: &job.fields_requested,
        };

        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ConnectorError::Unavailable(format!(
                "{} returned {}",
                self.endpoint,
                response.status()
            )));
        }

        let payload: RetrievalResponse = response
            .json()
            .await
            .map_err(|e| ConnectorError::InvalidResponse(e.to_string()))?;

        let mut values = FieldValues::new();
        for (path, value) in payload.fields {
            match path.parse::<BenefitField>() {
                Ok(field) => {
                    values.insert(field, value);
                }
                Err(_) => warn!(job_id = %job.job_id, path = %path, "Ignoring untracked field from backend"),
            }
        }
        debug!(job_id = %job.job_id, returned = values.len(), "HTTP retrieval finished");

        Ok(values)
    }
}
