//! End-to-end resolution pipeline tests
//!
//! Scenarios:
//! - A fully populated document: no jobs, no block, grade A
//! - A sparse clearinghouse response for a crown / SRP / bitewing day
//! - An empty document always blocks on wildcard CRITICAL fields
//! - Primary values win over recovered values
//! - Remaining maximum inferred from total and used
//! - Recovered sentinels stay missing
//! - Repeated runs over the same inputs agree
//! - Serialized breakdown keys fields by document path

mod common;

use benefit_resolution::*;
use common::*;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn simulated_sources() -> ConnectorRegistry {
    ConnectorRegistry::new()
        .with(Arc::new(SimulatedPortalConnector::new()))
        .with(Arc::new(SimulatedDocumentConnector::new()))
}

// ============================================================================
// TEST 1: Complete Document Needs No Retrieval
// ============================================================================

#[tokio::test]
async fn test_complete_document_needs_no_retrieval() {
    println!("\n✅ TEST 1: Complete document");

    let portal = Arc::new(FixedSource::new(RetrievalMethod::PortalScrape, json!("unused")));
    let calls = Arc::clone(&portal.calls);
    let service = service(ConnectorRegistry::new().with(portal), DispatchPolicy::default());
    let request = request(complete_document(), todays_schedule());

    let report = service.evaluate(&request).unwrap();
    assert!((report.completeness_score - 1.0).abs() < f64::EPSILON);
    assert_eq!(report.grade, Grade::A);
    assert_eq!(report.missing_count(), 0);
    assert!(report.retrieval_jobs.is_empty());
    assert!(!report.block_appointment);

    let breakdown = service.resolve(&request).await.unwrap();
    assert_eq!(breakdown.summary.primary, 16);
    assert!(breakdown.warnings.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    // deductible_met = 0 is a real value
    assert_eq!(breakdown.fields[&BenefitField::DeductibleMet], json!(0));

    println!("   ✓ 16/16 present, grade A, nothing dispatched");
}

// ============================================================================
// TEST 2: Sparse Clearinghouse Response
// ============================================================================

#[tokio::test]
async fn test_sparse_response_for_crown_srp_bitewing_day() {
    println!("\n🦷 TEST 2: Sparse 271 response");

    let service = service(simulated_sources(), DispatchPolicy::default());
    let request = request(
        json!({
            "individual_deductible": 5000,
            "deductible_met": 5000,
            "frequency_limits": {
                "D1110": { "times_per_period": 2, "period": "calendar_year", "used_this_period": 1 }
            }
        }),
        todays_schedule(),
    );

    let report = service.evaluate(&request).unwrap();
    assert_eq!(report.missing_count(), 13);
    assert_eq!(report.critical_missing.len(), 4);
    assert_eq!(report.important_missing.len(), 6);
    assert_eq!(report.nice_to_have_missing.len(), 3);
    assert!((report.completeness_score - 0.1875).abs() < 1e-9);
    assert_eq!(report.grade, Grade::F);
    assert!(report.block_appointment);

    let relevant_critical: Vec<&str> = report
        .critical_missing
        .iter()
        .filter(|record| record.relevant)
        .map(|record| record.descriptor.path())
        .collect();
    assert_eq!(
        relevant_critical,
        vec![
            "annual_maximum_remaining",
            "frequency_limits.D2740",
            "frequency_limits.D4341"
        ]
    );

    let methods: Vec<RetrievalMethod> = report.retrieval_jobs.iter().map(|job| job.method).collect();
    assert_eq!(
        methods,
        vec![RetrievalMethod::PortalScrape, RetrievalMethod::DocumentAnalysis]
    );
    // Irrelevant NICE_TO_HAVE fields are never dispatched
    for job in &report.retrieval_jobs {
        assert!(!job.requests(BenefitField::SealantFrequency));
        assert!(!job.requests(BenefitField::OrthoLifetimeMaximum));
        assert!(!job.requests(BenefitField::FluorideCoverage));
        assert_eq!(job.criticality, Criticality::Critical);
    }

    let breakdown = service.resolve(&request).await.unwrap();
    assert_eq!(breakdown.summary.primary, 3);
    assert_eq!(
        breakdown.provenance[&BenefitField::CrownFrequency],
        Provenance::Secondary(RetrievalMethod::PortalScrape)
    );
    assert_eq!(
        breakdown.provenance[&BenefitField::MissingToothClause],
        Provenance::Secondary(RetrievalMethod::DocumentAnalysis)
    );
    assert!((breakdown.primary_completeness_score - 0.1875).abs() < 1e-9);
    assert!(breakdown.completeness_score > breakdown.primary_completeness_score);
    assert!(breakdown.warnings.is_empty());

    println!(
        "   ✓ primary {:.0}% -> merged {:.0}% ({})",
        breakdown.primary_completeness_score * 100.0,
        breakdown.completeness_score * 100.0,
        breakdown.grade
    );
}

// ============================================================================
// TEST 3: Empty Document Blocks
// ============================================================================

#[test]
fn test_empty_document_blocks_any_schedule() {
    println!("\n🚫 TEST 3: Empty document");

    let service = service(ConnectorRegistry::new(), DispatchPolicy::default());

    for schedule in [vec![], vec!["Sealant D1351".to_string()]] {
        let report = service.evaluate(&request(json!({}), schedule)).unwrap();
        assert_eq!(report.completeness_score, 0.0);
        assert_eq!(report.grade, Grade::F);
        assert!(report.block_appointment);
    }

    println!("   ✓ wildcard CRITICAL fields block with or without a schedule");
}

// ============================================================================
// TEST 4: Primary Precedence
// ============================================================================

#[tokio::test]
async fn test_primary_value_wins_over_recovered_value() {
    println!("\n🥇 TEST 4: Primary precedence");

    let mut document = complete_document();
    document["coverage_pct"]
        .as_object_mut()
        .unwrap()
        .remove("major");

    let service = service(
        ConnectorRegistry::new().with(Arc::new(FixedSource::new(
            RetrievalMethod::PortalScrape,
            json!(999),
        ))),
        DispatchPolicy::default(),
    );
    let breakdown = service
        .resolve(&request(document, todays_schedule()))
        .await
        .unwrap();

    assert_eq!(breakdown.fields[&BenefitField::BasicCoverage], json!(80));
    assert_eq!(breakdown.provenance[&BenefitField::BasicCoverage], Provenance::Primary);
    assert_eq!(breakdown.fields[&BenefitField::MajorCoverage], json!(999));
    assert_eq!(
        breakdown.provenance[&BenefitField::MajorCoverage],
        Provenance::Secondary(RetrievalMethod::PortalScrape)
    );
    assert_eq!(breakdown.summary.secondary, 1);

    println!("   ✓ document value kept, only the gap filled");
}

// ============================================================================
// TEST 5: Inference
// ============================================================================

#[tokio::test]
async fn test_remaining_maximum_inferred_from_total_and_used() {
    println!("\n🧮 TEST 5: Inference");

    let service = service(ConnectorRegistry::new(), DispatchPolicy::default());
    let breakdown = service
        .resolve(&request(
            json!({ "annual_maximum": 200000, "annual_used": 55000 }),
            todays_schedule(),
        ))
        .await
        .unwrap();

    assert_eq!(breakdown.fields[&BenefitField::AnnualMaximumRemaining], json!(145000));
    assert_eq!(
        breakdown.provenance[&BenefitField::AnnualMaximumRemaining],
        Provenance::Inferred
    );
    assert!(breakdown
        .audit_trail
        .lines()
        .iter()
        .any(|line| line.contains("annual_maximum_remaining inferred as 145000 (200000 - 55000)")));
    assert!(!breakdown
        .warnings
        .iter()
        .any(|warning| warning.starts_with("Annual Maximum Remaining")));

    println!("   ✓ 200000 - 55000 = 145000 (INFERRED)");
}

// ============================================================================
// TEST 6: Recovered Sentinels Stay Missing
// ============================================================================

#[tokio::test]
async fn test_recovered_sentinel_is_not_accepted() {
    println!("\n🕳️  TEST 6: Sentinel from a secondary source");

    let service = service(
        ConnectorRegistry::new().with(Arc::new(FixedSource::new(
            RetrievalMethod::PortalScrape,
            json!("N/A"),
        ))),
        DispatchPolicy::default(),
    );
    let breakdown = service
        .resolve(&request(json!({}), vec!["Crown Prep #14 D2740".to_string()]))
        .await
        .unwrap();

    assert_eq!(breakdown.provenance[&BenefitField::CrownFrequency], Provenance::Missing);
    assert_eq!(breakdown.fields[&BenefitField::CrownFrequency], Value::Null);
    assert!(breakdown
        .warnings
        .iter()
        .any(|warning| warning.starts_with("Crown Frequency Limit")));

    println!("   ✓ \"N/A\" from the portal is still MISSING");
}

// ============================================================================
// TEST 7: Idempotence
// ============================================================================

#[tokio::test]
async fn test_repeated_runs_agree() {
    println!("\n🔁 TEST 7: Idempotence");

    let service = service(
        ConnectorRegistry::new()
            .with(Arc::new(FixedSource::new(RetrievalMethod::PortalScrape, json!("unknown"))))
            .with(Arc::new(SimulatedDocumentConnector::new())),
        DispatchPolicy::default(),
    );
    let request = request(
        json!({ "individual_deductible": 5000, "annual_maximum": 200000, "annual_used": 55000 }),
        todays_schedule(),
    );

    let first = service.resolve(&request).await.unwrap();
    let second = service.resolve(&request).await.unwrap();

    assert_eq!(first.fields, second.fields);
    assert_eq!(first.provenance, second.provenance);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.completeness_score, second.completeness_score);
    assert_eq!(first.warnings, second.warnings);
    assert!(!first.warnings.is_empty());

    println!("   ✓ {} warnings, identical across runs", first.warnings.len());
}

// ============================================================================
// TEST 8: Serialized Shape
// ============================================================================

#[tokio::test]
async fn test_breakdown_serializes_by_path() {
    println!("\n📦 TEST 8: Serialized breakdown");

    let service = service(simulated_sources(), DispatchPolicy::default());
    let breakdown = service
        .resolve(&request(json!({ "deductible_met": 0 }), todays_schedule()))
        .await
        .unwrap();
    let rendered = serde_json::to_value(&breakdown).unwrap();

    assert_eq!(rendered["patient_id"], json!("PT-8841"));
    assert_eq!(rendered["fields"]["deductible_met"], json!(0));
    assert_eq!(rendered["provenance"]["deductible_met"], json!("PRIMARY"));
    assert_eq!(
        rendered["provenance"]["frequency_limits.D2740"],
        json!("SECONDARY:PORTAL_SCRAPE")
    );
    assert_eq!(rendered["fields"].as_object().unwrap().len(), 16);

    println!("   ✓ fields keyed by document path");
}

// ============================================================================
// TEST 9: Idempotence With A Failing Source
// ============================================================================

#[tokio::test]
async fn test_repeated_runs_agree_when_a_source_fails() {
    println!("\n🔁 TEST 9: Idempotence with a failing portal");

    let service = service(
        ConnectorRegistry::new()
            .with(Arc::new(BrokenSource {
                method: RetrievalMethod::PortalScrape,
            }))
            .with(Arc::new(SimulatedDocumentConnector::new())),
        DispatchPolicy::default(),
    );
    let request = request(json!({ "individual_deductible": 5000 }), todays_schedule());

    let first = service.resolve(&request).await.unwrap();
    let second = service.resolve(&request).await.unwrap();

    assert!(first.warnings[0].starts_with("PORTAL_SCRAPE job failed (connector error:"));
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(first.fields, second.fields);
    assert_eq!(first.provenance, second.provenance);
    assert_eq!(first.completeness_score, second.completeness_score);

    println!("   ✓ failure warnings identical across runs");
}
