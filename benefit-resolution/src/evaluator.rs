use crate::document::{ensure_traversable, is_missing};
use crate::error::ResolutionResult;
use crate::jobs::{JobBuilder, RetrievalJob};
use crate::models::{completeness, AuditTrail, Criticality, Grade, PatientIdentity};
use crate::registry::{FieldDescriptor, FieldRegistry, Schedule};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// A registry field absent from the primary document
#[derive(Debug, Clone, Serialize)]
pub struct MissingFieldRecord {
    #[serde(flatten)]
    pub descriptor: Arc<FieldDescriptor>,
    /// Whether today's schedule needs this field
    pub relevant: bool,
}

/// Completeness assessment of one primary eligibility document
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    #[serde(flatten)]
    pub identity: PatientIdentity,
    pub evaluated_at: DateTime<Utc>,
    pub completeness_score: f64,
    pub grade: Grade,
    pub critical_missing: Vec<MissingFieldRecord>,
    pub important_missing: Vec<MissingFieldRecord>,
    pub nice_to_have_missing: Vec<MissingFieldRecord>,
    pub retrieval_jobs: Vec<RetrievalJob>,
    /// Hold the appointment: a CRITICAL field needed today is missing
    pub block_appointment: bool,
    pub audit_trail: AuditTrail,
}

impl IntegrityReport {
    /// Missing fields across all tiers, most critical first
    pub fn missing_fields(&self) -> impl Iterator<Item = &MissingFieldRecord> {
        self.critical_missing
            .iter()
            .chain(&self.important_missing)
            .chain(&self.nice_to_have_missing)
    }

    pub fn missing_count(&self) -> usize {
        self.critical_missing.len() + self.important_missing.len() + self.nice_to_have_missing.len()
    }
}

/// Classifies every registry field of a primary document as present or missing.
pub struct IntegrityEvaluator {
    registry: Arc<FieldRegistry>,
}

impl IntegrityEvaluator {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self { registry }
    }

    pub fn evaluate<S: AsRef<str>>(
        &self,
        document: &Value,
        scheduled_procedures: &[S],
        identity: &PatientIdentity,
    ) -> ResolutionResult<IntegrityReport> {
        ensure_traversable(document)?;

        let schedule = Schedule::new(scheduled_procedures);
        let mut audit = AuditTrail::new();
        let mut critical_missing = Vec::new();
        let mut important_missing = Vec::new();
        let mut nice_to_have_missing = Vec::new();
        let mut present = 0usize;

        audit.note(format!(
            "BEGIN integrity evaluation: patient {} | carrier: {}",
            identity.patient_id, identity.carrier
        ));
        let listed: Vec<&str> = scheduled_procedures.iter().map(|p| p.as_ref()).collect();
        audit.note(format!("Scheduled procedures: {listed:?}"));

        for descriptor in self.registry.lookup() {
            let path = descriptor.path();
            let value = descriptor.accessor().resolve(document);

            if !is_missing(value) {
                present += 1;
                audit.note(format!("  OK  {path}: present ({})", descriptor.criticality));
                continue;
            }

            let relevant = descriptor.is_relevant(&schedule);
            debug!(field = path, criticality = %descriptor.criticality, relevant, "Field missing");
            let record = MissingFieldRecord {
                descriptor: Arc::clone(descriptor),
                relevant,
            };

            match (descriptor.criticality, relevant) {
                (Criticality::Critical, true) => audit.note(format!("  CRITICAL  {path}: MISSING")),
                (Criticality::Critical, false) => {
                    audit.note(format!("  CRITICAL (not today's procedure)  {path}: MISSING"));
                }
                (Criticality::Important, true) => audit.note(format!("  IMPORTANT  {path}: MISSING")),
                (Criticality::Important, false) => {
                    audit.note(format!("  IMPORTANT (not today)  {path}: MISSING"));
                }
                (Criticality::NiceToHave, _) => audit.note(format!("  NICE_TO_HAVE  {path}: MISSING")),
            }

            match descriptor.criticality {
                Criticality::Critical => critical_missing.push(record),
                Criticality::Important => important_missing.push(record),
                Criticality::NiceToHave => nice_to_have_missing.push(record),
            }
        }

        let score = completeness(present, self.registry.len());
        let grade = Grade::from_score(score);
        let block_appointment = critical_missing.iter().any(|record| record.relevant);

        audit.note(format!("Completeness: {:.0}% ({grade})", score * 100.0));
        audit.note(format!(
            "Missing: CRITICAL {}, IMPORTANT {}, NICE_TO_HAVE {}",
            critical_missing.len(),
            important_missing.len(),
            nice_to_have_missing.len()
        ));
        audit.note(format!("Block appointment: {block_appointment}"));

        let missing: Vec<MissingFieldRecord> = critical_missing
            .iter()
            .chain(&important_missing)
            .chain(&nice_to_have_missing)
            .cloned()
            .collect();
        let retrieval_jobs = JobBuilder::build(&missing, identity, &mut audit);

        info!(
            completeness = score,
            grade = %grade,
            present,
            missing = missing.len(),
            jobs = retrieval_jobs.len(),
            block_appointment,
            "Integrity evaluation complete"
        );

        Ok(IntegrityReport {
            identity: identity.clone(),
            evaluated_at: Utc::now(),
            completeness_score: score,
            grade,
            critical_missing,
            important_missing,
            nice_to_have_missing,
            retrieval_jobs,
            block_appointment,
            audit_trail: audit,
        })
    }
}
