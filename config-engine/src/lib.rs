//! Configuration management for the benefit resolution engine
//!
//! - Compiled defaults for every setting
//! - Optional YAML or TOML file
//! - `BENEFIT_*` environment overrides (`__` separates nested keys)
//! - Validation before anything is returned
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigEngine;
//! use std::path::Path;
//!
//! let config = ConfigEngine::load(Some(Path::new("benefit-engine.yaml")))?;
//! println!("job timeout: {:?}", config.dispatch.job_timeout());
//! # Ok::<(), config_engine::ConfigError>(())
//! ```
//!
//! ```yaml
//! dispatch:
//!   global_deadline_ms: 30000
//!   job_timeout_ms: 10000
//!   max_concurrent_jobs: 4
//! registry:
//!   path: /etc/benefit-engine/registry.yaml
//! connectors:
//!   portal_scrape:
//!     kind: http
//!     endpoint: https://scraper.internal/v1/retrieve
//!   document_analysis:
//!     kind: simulated
//!   manual_script:
//!     kind: script
//! logging:
//!   log_level: info
//!   json: false
//!   redaction_enabled: true
//! ```

pub mod engine;
pub mod error;
pub mod providers;
pub mod settings;
pub mod validation;

pub use engine::*;
pub use error::*;
pub use settings::*;
pub use validation::ConfigValidator;
