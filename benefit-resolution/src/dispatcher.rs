use crate::connectors::{ConnectorRegistry, SecondarySource};
use crate::jobs::{FieldValues, JobFailure, JobStatus, RetrievalJob};
use crate::models::{AuditTrail, RetrievalMethod};
use crate::registry::BenefitField;
use config_engine::DispatchSettings;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, error, info, warn};

/// Timing and concurrency bounds for one dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub global_deadline: Duration,
    pub job_timeout: Duration,
    pub max_concurrent_jobs: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::from(&DispatchSettings::default())
    }
}

impl From<&DispatchSettings> for DispatchPolicy {
    fn from(settings: &DispatchSettings) -> Self {
        Self {
            global_deadline: settings.global_deadline(),
            job_timeout: settings.job_timeout(),
            max_concurrent_jobs: settings.max_concurrent_jobs,
        }
    }
}

/// Everything the dispatch phase produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecoveredFields {
    /// Union of every completed job's result
    pub values: FieldValues,
    /// Settled jobs in dispatch order
    pub jobs: Vec<RetrievalJob>,
    /// One entry per failed or timed-out job
    pub warnings: Vec<String>,
    pub audit_trail: AuditTrail,
}

impl RecoveredFields {
    /// Method of the job whose result supplied `field`
    pub fn supplier(&self, field: BenefitField) -> Option<RetrievalMethod> {
        self.jobs
            .iter()
            .rev()
            .find(|job| job.result.contains_key(&field))
            .map(|job| job.method)
    }

    pub fn failed_jobs(&self) -> impl Iterator<Item = &RetrievalJob> {
        self.jobs.iter().filter(|job| job.status == JobStatus::Failed)
    }
}

enum Outcome {
    Recovered(FieldValues),
    Failed(String),
    TimedOut,
    Panicked,
}

/// Runs retrieval jobs concurrently against the registered connectors.
pub struct Dispatcher {
    connectors: ConnectorRegistry,
    policy: DispatchPolicy,
}

impl Dispatcher {
    pub fn new(connectors: ConnectorRegistry, policy: DispatchPolicy) -> Self {
        Self { connectors, policy }
    }

    /// Execute every job and collect the recovered values.
    ///
    /// Never fails: connector errors, timeouts, panics and the global deadline
    /// all settle the affected job as `FAILED` and leave siblings untouched.
    pub async fn dispatch(&self, mut jobs: Vec<RetrievalJob>) -> RecoveredFields {
        let mut audit = AuditTrail::new();
        if jobs.is_empty() {
            return RecoveredFields::default();
        }

        // Stable: method order is kept within a criticality tier
        jobs.sort_by(|a, b| b.criticality.cmp(&a.criticality));
        audit.note(format!("BEGIN dispatch: {} job(s)", jobs.len()));

        let deadline = Instant::now() + self.policy.global_deadline;
        let semaphore = Arc::new(Semaphore::new(self.policy.max_concurrent_jobs.max(1)));
        let mut in_flight: JoinSet<(usize, Outcome)> = JoinSet::new();
        let mut deadline_hit = false;

        for (index, job) in jobs.iter_mut().enumerate() {
            let Some(connector) = self.connectors.get(job.method) else {
                warn!(job_id = %job.job_id, method = %job.method, "No connector registered");
                job.fail(JobFailure::NoConnector);
                continue;
            };

            // Permits are taken in criticality order, so CRITICAL jobs start first
            let permit = match timeout_at(deadline, Arc::clone(&semaphore).acquire_owned()).await {
                Ok(Ok(permit)) => permit,
                Ok(Err(_)) | Err(_) => {
                    deadline_hit = true;
                    break;
                }
            };

            job.start();
            info!(
                job_id = %job.job_id,
                method = %job.method,
                criticality = %job.criticality,
                connector = connector.name(),
                "Executing retrieval job"
            );
            audit.note(format!(
                "Executing job {} | method: {} | criticality: {}",
                job.short_id(),
                job.method,
                job.criticality
            ));

            let snapshot = job.clone();
            let job_timeout = self.policy.job_timeout;
            in_flight.spawn(run_job(index, snapshot, connector, job_timeout, permit));
        }

        loop {
            match timeout_at(deadline, in_flight.join_next()).await {
                Ok(Some(Ok((index, outcome)))) => {
                    if let Some(job) = jobs.get_mut(index) {
                        settle(job, outcome, &mut audit);
                    }
                }
                Ok(Some(Err(join_error))) => {
                    error!(error = %join_error, "Retrieval task ended without reporting");
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        outstanding = in_flight.len(),
                        deadline = ?self.policy.global_deadline,
                        "Global dispatch deadline reached; aborting outstanding jobs"
                    );
                    in_flight.abort_all();
                    deadline_hit = true;
                    break;
                }
            }
        }

        // Anything unsettled was cut off by the deadline or lost its task
        for job in jobs.iter_mut().filter(|job| !job.is_settled()) {
            let failure = if deadline_hit {
                JobFailure::DeadlineExceeded
            } else {
                JobFailure::Panicked
            };
            audit.note(format!(
                "Job {} ({}) FAILED: {}",
                job.short_id(),
                job.method,
                failure
            ));
            job.fail(failure);
        }

        let mut values = FieldValues::new();
        let mut warnings = Vec::new();
        for job in &jobs {
            // Last write wins; jobs request disjoint fields so this never collides in practice
            values.extend(job.result.iter().map(|(field, value)| (*field, value.clone())));

            // Job ids stay in the audit trail; warnings must not vary between runs
            if let Some(failure) = &job.failure {
                let paths: Vec<&str> = job.fields_requested.iter().map(|f| f.path()).collect();
                warnings.push(format!(
                    "{} job failed ({}); unresolved: {}",
                    job.method,
                    failure,
                    paths.join(", ")
                ));
            }
        }

        audit.note(format!(
            "END dispatch: {} field(s) recovered, {} job(s) failed",
            values.len(),
            warnings.len()
        ));

        RecoveredFields {
            values,
            jobs,
            warnings,
            audit_trail: audit,
        }
    }
}

async fn run_job(
    index: usize,
    job: RetrievalJob,
    connector: Arc<dyn SecondarySource>,
    job_timeout: Duration,
    _permit: tokio::sync::OwnedSemaphorePermit,
) -> (usize, Outcome) {
    let call = AssertUnwindSafe(connector.retrieve(&job)).catch_unwind();
    let outcome = match timeout(job_timeout, call).await {
        Ok(Ok(Ok(values))) => Outcome::Recovered(values),
        Ok(Ok(Err(e))) => Outcome::Failed(e.to_string()),
        Ok(Err(_panic)) => Outcome::Panicked,
        Err(_) => Outcome::TimedOut,
    };
    (index, outcome)
}

fn settle(job: &mut RetrievalJob, outcome: Outcome, audit: &mut AuditTrail) {
    let failure = match outcome {
        Outcome::Recovered(values) => {
            let dropped = job.complete(values);
            if !dropped.is_empty() {
                warn!(job_id = %job.job_id, fields = ?dropped, "Connector returned unrequested fields; discarded");
            }
            let unsupplied = job.unsupplied();
            if !unsupplied.is_empty() {
                debug!(job_id = %job.job_id, fields = ?unsupplied, "Fields not recovered");
            }
            info!(
                job_id = %job.job_id,
                method = %job.method,
                recovered = job.result.len(),
                requested = job.fields_requested.len(),
                "Retrieval job complete"
            );
            audit.note(format!(
                "Job {} ({}) COMPLETE: {}/{} field(s) recovered",
                job.short_id(),
                job.method,
                job.result.len(),
                job.fields_requested.len()
            ));
            return;
        }
        Outcome::Failed(message) => JobFailure::ConnectorError(message),
        Outcome::TimedOut => JobFailure::TimedOut,
        Outcome::Panicked => JobFailure::Panicked,
    };

    warn!(job_id = %job.job_id, method = %job.method, failure = %failure, "Retrieval job failed");
    audit.note(format!(
        "Job {} ({}) FAILED: {}",
        job.short_id(),
        job.method,
        failure
    ));
    job.fail(failure);
}
