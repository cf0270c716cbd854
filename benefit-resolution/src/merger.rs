use crate::dispatcher::RecoveredFields;
use crate::document::is_missing;
use crate::evaluator::IntegrityReport;
use crate::models::{completeness, AuditTrail, Criticality, Grade, PatientIdentity, Provenance};
use crate::registry::{BenefitField, DocumentPath, FieldRegistry, Schedule};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Derives a missing "remaining" quantity from its total and used counterparts
#[derive(Debug, Clone)]
pub struct InferenceRule {
    pub target: BenefitField,
    pub total: DocumentPath,
    pub used: DocumentPath,
}

impl InferenceRule {
    pub fn new(target: BenefitField, total: &'static str, used: &'static str) -> Self {
        Self {
            target,
            total: DocumentPath::new(total),
            used: DocumentPath::new(used),
        }
    }

    /// The rules shipped with the engine
    pub fn defaults() -> Vec<InferenceRule> {
        vec![InferenceRule::new(
            BenefitField::AnnualMaximumRemaining,
            "annual_maximum",
            "annual_used",
        )]
    }

    /// `total - used`, integer when both inputs are integers
    fn apply(&self, total: &Value, used: &Value) -> Option<Value> {
        if let (Some(total), Some(used)) = (total.as_i64(), used.as_i64()) {
            return total.checked_sub(used).map(Value::from);
        }
        let remaining = total.as_f64()? - used.as_f64()?;
        Number::from_f64(remaining).map(Value::Number)
    }
}

/// Per-provenance field counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProvenanceSummary {
    pub primary: usize,
    pub secondary: usize,
    pub inferred: usize,
    pub missing: usize,
}

impl ProvenanceSummary {
    fn record(&mut self, provenance: Provenance) {
        match provenance {
            Provenance::Primary => self.primary += 1,
            Provenance::Secondary(_) => self.secondary += 1,
            Provenance::Inferred => self.inferred += 1,
            Provenance::Missing => self.missing += 1,
        }
    }
}

/// The canonical, provenance-tagged benefit record handed to callers
#[derive(Debug, Clone, Serialize)]
pub struct SmartBreakdown {
    #[serde(flatten)]
    pub identity: PatientIdentity,
    pub completed_at: DateTime<Utc>,
    pub completeness_score: f64,
    pub grade: Grade,
    /// Completeness of the primary document alone
    pub primary_completeness_score: f64,
    /// Every registry field; `null` when unresolved
    pub fields: BTreeMap<BenefitField, Value>,
    pub provenance: BTreeMap<BenefitField, Provenance>,
    pub summary: ProvenanceSummary,
    pub warnings: Vec<String>,
    pub audit_trail: AuditTrail,
}

/// Applies source precedence and inference to produce a [`SmartBreakdown`].
pub struct DataMerger {
    registry: Arc<FieldRegistry>,
    rules: Vec<InferenceRule>,
}

impl DataMerger {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self::with_rules(registry, InferenceRule::defaults())
    }

    pub fn with_rules(registry: Arc<FieldRegistry>, rules: Vec<InferenceRule>) -> Self {
        Self { registry, rules }
    }

    /// Merge is pure: identical inputs give identical output apart from
    /// timestamps.
    pub fn merge<S: AsRef<str>>(
        &self,
        document: &Value,
        recovered: &RecoveredFields,
        report: &IntegrityReport,
        scheduled_procedures: &[S],
    ) -> SmartBreakdown {
        let schedule = Schedule::new(scheduled_procedures);
        let mut audit = AuditTrail::new();
        let mut fields = BTreeMap::new();
        let mut provenance = BTreeMap::new();
        let mut missing_warnings = Vec::new();

        audit.note("BEGIN data merge");

        for descriptor in self.registry.lookup() {
            let field = descriptor.field;
            let path = descriptor.path();

            let primary = descriptor.accessor().resolve(document);
            let secondary = recovered.values.get(&field);

            let (value, source) = if !is_missing(primary) {
                audit.note(format!("  OK {path} <- PRIMARY"));
                (primary.cloned().unwrap_or(Value::Null), Provenance::Primary)
            } else if !is_missing(secondary) {
                let method = recovered
                    .supplier(field)
                    .unwrap_or(descriptor.preferred_method);
                let source = Provenance::Secondary(method);
                audit.note(format!("  OK {path} <- {source}"));
                (secondary.cloned().unwrap_or(Value::Null), source)
            } else if let Some((inferred, total, used)) = self.infer(field, document, recovered) {
                audit.note(format!("  ~ {path} inferred as {inferred} ({total} - {used})"));
                (inferred, Provenance::Inferred)
            } else {
                audit.note(format!("  X {path}: still MISSING after all retrieval attempts"));
                let needed_today = descriptor.criticality >= Criticality::Important
                    && descriptor.is_relevant(&schedule);
                if needed_today {
                    missing_warnings.push(format!(
                        "{} could not be retrieved; estimate may be inaccurate",
                        descriptor.label
                    ));
                }
                (Value::Null, Provenance::Missing)
            };

            fields.insert(field, value);
            provenance.insert(field, source);
        }

        let mut summary = ProvenanceSummary::default();
        for source in provenance.values() {
            summary.record(*source);
        }

        let resolved = fields.values().filter(|value| !value.is_null()).count();
        let score = completeness(resolved, self.registry.len());
        let grade = Grade::from_score(score);
        audit.note(format!("Merged completeness: {:.0}% ({grade})", score * 100.0));
        audit.note("END data merge");

        info!(
            completeness = score,
            grade = %grade,
            primary = summary.primary,
            secondary = summary.secondary,
            inferred = summary.inferred,
            missing = summary.missing,
            "Data merge complete"
        );

        let mut warnings = recovered.warnings.clone();
        warnings.extend(missing_warnings);

        let mut audit_trail = report.audit_trail.clone();
        audit_trail.append(&recovered.audit_trail);
        audit_trail.append(&audit);

        SmartBreakdown {
            identity: report.identity.clone(),
            completed_at: Utc::now(),
            completeness_score: score,
            grade,
            primary_completeness_score: report.completeness_score,
            fields,
            provenance,
            summary,
            warnings,
            audit_trail,
        }
    }

    fn infer(
        &self,
        field: BenefitField,
        document: &Value,
        recovered: &RecoveredFields,
    ) -> Option<(Value, Value, Value)> {
        self.rules
            .iter()
            .filter(|rule| rule.target == field)
            .find_map(|rule| {
                let total = known_value(&rule.total, document, recovered)?;
                let used = known_value(&rule.used, document, recovered)?;
                let inferred = rule.apply(total, used)?;
                Some((inferred, total.clone(), used.clone()))
            })
    }
}

/// A rule input from the primary document, else from recovered data
fn known_value<'a>(
    path: &DocumentPath,
    document: &'a Value,
    recovered: &'a RecoveredFields,
) -> Option<&'a Value> {
    let primary = path.resolve(document);
    if !is_missing(primary) {
        return primary;
    }
    let field: BenefitField = path.as_str().parse().ok()?;
    recovered.values.get(&field).filter(|value| !is_missing(Some(value)))
}
