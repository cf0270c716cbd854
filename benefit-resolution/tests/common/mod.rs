//! Shared fixtures and connector doubles for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use benefit_resolution::*;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn registry() -> Arc<FieldRegistry> {
    Arc::new(FieldRegistry::builtin().expect("built-in registry loads"))
}

pub fn identity() -> PatientIdentity {
    PatientIdentity::new("PT-8841", "Delta Dental PPO", "DD00112233")
}

pub fn todays_schedule() -> Vec<String> {
    vec![
        "Crown Prep #14 D2740".to_string(),
        "Perio SRP D4341 Q1 Q2".to_string(),
        "4 Bitewing BWX D0274".to_string(),
    ]
}

/// A document with every built-in field populated
pub fn complete_document() -> Value {
    json!({
        "annual_maximum_remaining": 145000,
        "individual_deductible": 5000,
        "deductible_met": 0,
        "frequency_limits": {
            "D2740": { "times_per_period": 1, "period": "5_years" },
            "D4341": { "quads_per_year": 4, "used_this_year": 0 },
            "D1110": { "times_per_period": 2, "period": "calendar_year", "used_this_period": 1 },
            "D0274": { "times_per_period": 1, "period": "calendar_year", "used_this_period": 0 },
            "D4910": { "times_per_period": 4, "period": "calendar_year" },
            "D1351": { "age_limit": 14 }
        },
        "missing_tooth_clause": { "applies": false },
        "waiting_period": { "major": { "months": 0 } },
        "composite_posterior_downgrade": false,
        "coverage_pct": { "basic": 80, "major": 50 },
        "ortho_lifetime_maximum": 150000,
        "fluoride_coverage": true
    })
}

/// Answers every requested field with a fixed value
pub struct FixedSource {
    pub method: RetrievalMethod,
    pub value: Value,
    pub calls: Arc<AtomicUsize>,
}

impl FixedSource {
    pub fn new(method: RetrievalMethod, value: Value) -> Self {
        Self {
            method,
            value,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SecondarySource for FixedSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn method(&self) -> RetrievalMethod {
        self.method
    }

    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(job
            .fields_requested
            .iter()
            .map(|field| (*field, self.value.clone()))
            .collect())
    }
}

/// Always errors
pub struct BrokenSource {
    pub method: RetrievalMethod,
}

#[async_trait]
impl SecondarySource for BrokenSource {
    fn name(&self) -> &str {
        "broken"
    }

    fn method(&self) -> RetrievalMethod {
        self.method
    }

    async fn retrieve(&self, _job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        Err(ConnectorError::Unavailable("portal login rejected".to_string()))
    }
}

/// Sleeps before answering
pub struct SlowSource {
    pub method: RetrievalMethod,
    pub delay: Duration,
}

#[async_trait]
impl SecondarySource for SlowSource {
    fn name(&self) -> &str {
        "slow"
    }

    fn method(&self) -> RetrievalMethod {
        self.method
    }

    async fn retrieve(&self, job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        tokio::time::sleep(self.delay).await;
        Ok(job
            .fields_requested
            .iter()
            .map(|field| (*field, json!("late")))
            .collect())
    }
}

/// Panics inside the connector call
pub struct PanickingSource {
    pub method: RetrievalMethod,
}

#[async_trait]
impl SecondarySource for PanickingSource {
    fn name(&self) -> &str {
        "panicking"
    }

    fn method(&self) -> RetrievalMethod {
        self.method
    }

    async fn retrieve(&self, _job: &RetrievalJob) -> ConnectorResult<FieldValues> {
        panic!("scraper crashed on unexpected portal layout");
    }
}

pub fn service(connectors: ConnectorRegistry, policy: DispatchPolicy) -> BenefitResolutionService {
    BenefitResolutionService::new(registry(), connectors, policy)
}

pub fn request(document: Value, schedule: Vec<String>) -> ResolutionRequest {
    ResolutionRequest {
        identity: identity(),
        document,
        scheduled_procedures: schedule,
    }
}
