//! Multi-source dental benefit resolution
//!
//! Clearinghouse eligibility responses are frequently incomplete. This crate
//! decides which benefit fields are missing, how urgently each one matters for
//! today's scheduled procedures, recovers them from secondary sources
//! concurrently, and merges everything into one provenance-tagged record.
//!
//! Pipeline, leaf first:
//! - **Field registry**: static, versioned table of tracked benefit fields
//! - **Integrity evaluator**: missing-field classification, completeness
//!   score and grade, block decision
//! - **Job builder**: one retrieval job per preferred recovery method
//! - **Dispatcher**: bounded concurrent execution with per-job timeouts and a
//!   global deadline
//! - **Data merger**: primary > secondary > inferred > missing precedence
//!
//! # Example
//!
//! ```rust,no_run
//! use benefit_resolution::{BenefitResolutionService, PatientIdentity, ResolutionRequest};
//! use config_engine::EngineConfig;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = BenefitResolutionService::from_config(&EngineConfig::default())?;
//! let breakdown = service
//!     .resolve(&ResolutionRequest {
//!         identity: PatientIdentity::new("PT-8841", "Delta Dental PPO", "DD00112233"),
//!         document: json!({ "individual_deductible": 5000, "deductible_met": 5000 }),
//!         scheduled_procedures: vec!["Crown Prep #14 D2740".into()],
//!     })
//!     .await?;
//! println!("{} ({:.0}%)", breakdown.grade, breakdown.completeness_score * 100.0);
//! # Ok(())
//! # }
//! ```

pub mod connectors;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod jobs;
pub mod merger;
pub mod models;
pub mod registry;
pub mod service;

pub use connectors::{
    create_connector, ConnectorError, ConnectorRegistry, ConnectorResult, HttpSourceConnector,
    ManualScriptConnector, SecondarySource, SimulatedDocumentConnector, SimulatedPortalConnector,
};
pub use dispatcher::*;
pub use document::is_missing;
pub use error::*;
pub use evaluator::*;
pub use jobs::*;
pub use merger::*;
pub use models::*;
pub use registry::{
    BenefitField, DocumentPath, FieldDescriptor, FieldRegistry, ProcedureMatchers, Schedule,
};
pub use service::*;
