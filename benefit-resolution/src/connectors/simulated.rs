// Fixture-backed connectors for demo and staging deployments.
// They answer instantly with the values a real portal / plan document
// returned for the reference member, restricted to the requested fields.
use super::{ConnectorResult, SecondarySource};
use crate::jobs::{FieldValues, RetrievalJob};
use crate::models::RetrievalMethod;
use crate::registry::BenefitField;
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

fn fixture_subset(name: &str, job: &RetrievalJob, fixture: &FieldValues) -> FieldValues {
    let result: FieldValues = job
        .fields_requested
        .iter()
        .filter_map(|field| fixture.get(field).map(|value| (*field, value.clone())))
        .collect();

    let unsupplied: Vec<BenefitField> = job
        .fields_requested
        .iter()
        .copied()
        .filter(|field| !result.contains_key(field))
        .collect();
    if !unsupplied.is_empty() {
        warn!(connector = name, job_id = %job.job_id, fields = ?unsupplied, "Fields could not be retrieved");
    }

    result
}

/// Carrier portal scrape stand-in
pub struct SimulatedPortalConnector {
    fixture: FieldValues,
}

impl SimulatedPortalConnector {
    pub fn new() -> Self {
        let fixture = FieldValues::from([
            // Monetary amounts are in cents
            (BenefitField::AnnualMaximumRemaining, json!(145_000)),
            (BenefitField::IndividualDeductible, json!(5_000)),
            (BenefitField::DeductibleMet, json!(5_000)),
            (
                BenefitField::ProphylaxisFrequency,
                json!({
                    "times_per_period": 2,
                    "period": "calendar_year",
                    "used_this_period": 1,
                    "next_eligible_date": "2025-07-10"
                }),
            ),
            (
                BenefitField::BitewingFrequency,
                json!({
                    "times_per_period": 1,
                    "period": "calendar_year",
                    "used_this_period": 0,
                    "next_eligible_date": null
                }),
            ),
            (
                BenefitField::CrownFrequency,
                json!({
                    "times_per_period": 1,
                    "period": "5_years",
                    "last_service_date": null,
                    "next_eligible_date": null
                }),
            ),
            (
                BenefitField::PerioScalingFrequency,
                json!({
                    "quads_per_year": 4,
                    "used_this_year": 0,
                    "last_service_date": null
                }),
            ),
            (BenefitField::CompositePosteriorDowngrade, json!(false)),
            (BenefitField::BasicCoverage, json!(80)),
            (BenefitField::MajorCoverage, json!(50)),
        ]);
        Self { fixture }
    }
}

impl Default for SimulatedPortalConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecondarySource for SimulatedPortalConnector {
    fn name(&self) -> &str {
        "simulated-portal"
    }

    fn method(&self) -> RetrievalMethod {
        RetrievalMethod::PortalScrape
    }

    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        info!(job_id = %job.job_id, carrier = %job.identity.carrier, "Portal scrape executing");
        Ok(fixture_subset(self.name(), job, &self.fixture))
    }
}

/// Plan document / EOB analysis stand-in
pub struct SimulatedDocumentConnector {
    fixture: FieldValues,
}

impl SimulatedDocumentConnector {
    pub fn new() -> Self {
        let fixture = FieldValues::from([
            (
                BenefitField::MissingToothClause,
                json!({
                    "applies": false,
                    "notes": "No missing tooth clause identified in plan documents.",
                    "affected_teeth": []
                }),
            ),
            (
                BenefitField::MajorWaitingPeriod,
                json!({
                    "months": 0,
                    "waived_for": "accident",
                    "effective_date": "2024-01-01"
                }),
            ),
            (
                BenefitField::PerioMaintenanceFrequency,
                json!({
                    "times_per_period": 4,
                    "period": "calendar_year",
                    "used_this_period": 0
                }),
            ),
            (BenefitField::OrthoLifetimeMaximum, json!(150_000)),
            (BenefitField::FluorideCoverage, json!(true)),
        ]);
        Self { fixture }
    }
}

impl Default for SimulatedDocumentConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecondarySource for SimulatedDocumentConnector {
    fn name(&self) -> &str {
        "simulated-document"
    }

    fn method(&self) -> RetrievalMethod {
        RetrievalMethod::DocumentAnalysis
    }

    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        info!(job_id = %job.job_id, "Document analysis executing");
        Ok(fixture_subset(self.name(), job, &self.fixture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criticality, PatientIdentity};

    fn job(method: RetrievalMethod, fields: Vec<BenefitField>) -> RetrievalJob {
        RetrievalJob::new(
            PatientIdentity::new("PT-1", "Delta Dental PPO", "DD00112233"),
            method,
            fields,
            Criticality::Critical,
        )
    }

    #[tokio::test]
    async fn test_portal_returns_requested_subset_only() {
        let connector = SimulatedPortalConnector::new();
        let job = job(
            RetrievalMethod::PortalScrape,
            vec![BenefitField::CrownFrequency, BenefitField::BasicCoverage],
        );
        let values = connector.retrieve(&job).await.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[&BenefitField::BasicCoverage], json!(80));
        assert_eq!(values[&BenefitField::CrownFrequency]["period"], json!("5_years"));
    }

    #[tokio::test]
    async fn test_unknown_fields_are_absent_not_errors() {
        let connector = SimulatedPortalConnector::new();
        let job = job(
            RetrievalMethod::PortalScrape,
            vec![BenefitField::MissingToothClause, BenefitField::DeductibleMet],
        );
        let values = connector.retrieve(&job).await.unwrap();
        assert_eq!(values.keys().copied().collect::<Vec<_>>(), vec![BenefitField::DeductibleMet]);
    }

    #[tokio::test]
    async fn test_document_fixture() {
        let connector = SimulatedDocumentConnector::new();
        let job = job(
            RetrievalMethod::DocumentAnalysis,
            vec![BenefitField::MissingToothClause, BenefitField::MajorWaitingPeriod],
        );
        let values = connector.retrieve(&job).await.unwrap();
        assert_eq!(values[&BenefitField::MissingToothClause]["applies"], json!(false));
        assert_eq!(values[&BenefitField::MajorWaitingPeriod]["months"], json!(0));
    }
}
