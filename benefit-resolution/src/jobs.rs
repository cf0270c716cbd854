use crate::evaluator::MissingFieldRecord;
use crate::models::{AuditTrail, Criticality, PatientIdentity, RetrievalMethod};
use crate::registry::BenefitField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;
use uuid::Uuid;

/// Field values keyed by benefit field
pub type FieldValues = BTreeMap<BenefitField, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
}

/// Why a job ended in `FAILED`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobFailure {
    ConnectorError(String),
    TimedOut,
    DeadlineExceeded,
    NoConnector,
    Panicked,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectorError(message) => write!(f, "connector error: {message}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::DeadlineExceeded => f.write_str("global dispatch deadline exceeded"),
            Self::NoConnector => f.write_str("no connector registered"),
            Self::Panicked => f.write_str("connector panicked"),
        }
    }
}

/// A unit of recovery work for one secondary-source method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalJob {
    pub job_id: Uuid,
    pub identity: PatientIdentity,
    pub method: RetrievalMethod,
    pub fields_requested: Vec<BenefitField>,
    /// Highest criticality among the requested fields
    pub criticality: Criticality,
    pub created_at: DateTime<Utc>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure: Option<JobFailure>,
    pub result: FieldValues,
}

impl RetrievalJob {
    pub fn new(
        identity: PatientIdentity,
        method: RetrievalMethod,
        fields_requested: Vec<BenefitField>,
        criticality: Criticality,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            identity,
            method,
            fields_requested,
            criticality,
            created_at: Utc::now(),
            status: JobStatus::Pending,
            failure: None,
            result: BTreeMap::new(),
        }
    }

    /// First eight characters of the job id, used in log and audit lines
    pub fn short_id(&self) -> String {
        self.job_id.simple().to_string().chars().take(8).collect()
    }

    pub fn requests(&self, field: BenefitField) -> bool {
        self.fields_requested.contains(&field)
    }

    pub fn start(&mut self) {
        self.status = JobStatus::InProgress;
    }

    /// Settle successfully. Values for fields this job did not request are
    /// discarded so jobs always write disjoint key sets.
    pub fn complete(&mut self, mut values: FieldValues) -> Vec<BenefitField> {
        let unrequested: Vec<BenefitField> = values
            .keys()
            .copied()
            .filter(|field| !self.requests(*field))
            .collect();
        for field in &unrequested {
            values.remove(field);
        }
        self.result = values;
        self.status = JobStatus::Complete;
        self.failure = None;
        unrequested
    }

    pub fn fail(&mut self, failure: JobFailure) {
        self.result.clear();
        self.status = JobStatus::Failed;
        self.failure = Some(failure);
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.status, JobStatus::Complete | JobStatus::Failed)
    }

    /// Requested fields the job did not return
    pub fn unsupplied(&self) -> Vec<BenefitField> {
        self.fields_requested
            .iter()
            .copied()
            .filter(|field| !self.result.contains_key(field))
            .collect()
    }
}

/// Groups missing fields into one job per preferred retrieval method.
pub struct JobBuilder;

impl JobBuilder {
    /// NICE_TO_HAVE fields are skipped unless relevant to today's schedule.
    /// Only the preferred method is used; fallbacks are never scheduled here.
    pub fn build(
        missing: &[MissingFieldRecord],
        identity: &PatientIdentity,
        audit: &mut AuditTrail,
    ) -> Vec<RetrievalJob> {
        let mut jobs = Vec::new();

        for method in RetrievalMethod::DISPATCH_ORDER {
            let batch: Vec<&MissingFieldRecord> = missing
                .iter()
                .filter(|record| record.descriptor.preferred_method == method)
                .filter(|record| {
                    record.descriptor.criticality != Criticality::NiceToHave || record.relevant
                })
                .collect();

            let Some(top) = batch.iter().map(|r| r.descriptor.criticality).max() else {
                continue;
            };

            let fields: Vec<BenefitField> = batch.iter().map(|r| r.descriptor.field).collect();
            let job = RetrievalJob::new(identity.clone(), method, fields, top);

            info!(
                job_id = %job.job_id,
                method = %method,
                criticality = %top,
                fields = ?job.fields_requested,
                "Retrieval job created"
            );
            audit.note(format!(
                "DISPATCH {} job {}... ({} fields, top criticality: {})",
                method,
                job.short_id(),
                job.fields_requested.len(),
                top
            ));
            jobs.push(job);
        }

        jobs
    }
}
