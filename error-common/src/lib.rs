//! Common error handling utilities for the benefit resolution engine
//!
//! Every crate in the workspace keeps its own precise `thiserror` enum and
//! converts into [`EngineError`] at the boundary. This crate provides:
//!
//! - **Standardized Error Type**: [`EngineError`] with one variant per failure category
//! - **Error Codes**: stable code strings for every category ([`codes`])
//! - **Logging**: [`log_error`] emits a structured tracing event
//!
//! # Error Categories
//!
//! - **Registry**: malformed field registry (fatal at startup)
//! - **Config**: configuration load / validation failures (fatal at startup)
//! - **Input**: eligibility document is not traversable
//! - **Connector**: a secondary source could not be constructed
//! - **Io / Serialization**: infrastructure errors
//!
//! Missing benefit data is never an error; it is reported as data by the
//! resolution engine.
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, EngineError};
//!
//! fn check_root(doc: &serde_json::Value) -> Result<(), EngineError> {
//!     if !doc.is_object() {
//!         return Err(EngineError::input(
//!             codes::input::MALFORMED_DOCUMENT,
//!             "eligibility document must be a JSON object",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_root(&serde_json::json!([1, 2])).unwrap_err();
//! assert_eq!(err.code(), "INPUT_3001");
//! ```

pub mod codes;
pub mod types;

pub use types::*;
