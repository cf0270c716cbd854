//! Logging with automatic PII redaction
//!
//! Eligibility verification handles member IDs, patient identifiers and
//! contact details. This crate installs the tracing subscriber used by the
//! workspace binaries and redacts those values from log lines before they
//! reach a sink.
//!
//! # Detected Data Types
//!
//! - **Member IDs**: DD00112233 → MEMBER[hash]
//! - **SSN**: 123-45-6789 → SSN[hash]
//! - **Phone Numbers**: 555-123-4567 → PHONE[hash]
//! - **Email Addresses**: user@example.com → EMAIL[hash]
//!
//! Hashes are stable so redacted values can still be correlated across lines.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, redacted_info, LoggerConfig};
//!
//! init_tracing(&LoggerConfig::default()).expect("subscriber");
//! redacted_info!("Verifying member {}", "DD00112233");
//! // Output: "Verifying member MEMBER[...]"
//! ```

pub mod config;
pub mod error;
pub mod macros;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use error::*;
pub use redactor::*;
pub use subscriber::*;

// Re-exported for the redacted_* macros
pub use tracing;
