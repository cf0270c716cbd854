use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

/// Who the eligibility data belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIdentity {
    pub patient_id: String,
    pub carrier: String,
    pub member_id: String,
}

impl PatientIdentity {
    pub fn new(
        patient_id: impl Into<String>,
        carrier: impl Into<String>,
        member_id: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            carrier: carrier.into(),
            member_id: member_id.into(),
        }
    }
}

/// One resolution request: the clearinghouse document plus today's schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub identity: PatientIdentity,
    /// Raw eligibility document as produced by the upstream normalizer
    pub document: serde_json::Value,
    /// Free-text procedure descriptions, e.g. "Crown Prep #14 D2740"
    pub scheduled_procedures: Vec<String>,
}

/// How urgently a benefit field must be known before treatment.
///
/// Ordering follows urgency: `Critical > Important > NiceToHave`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criticality {
    NiceToHave,
    Important,
    Critical,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Important => "IMPORTANT",
            Self::NiceToHave => "NICE_TO_HAVE",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary recovery capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetrievalMethod {
    /// Bot logs into the carrier portal and scrapes the field
    PortalScrape,
    /// Extraction from plan documents / EOB PDFs
    DocumentAnalysis,
    /// Pre-filled call script for staff; no automated data
    ManualScript,
}

impl RetrievalMethod {
    /// Job emission order: automated, cheap methods before human-involving ones.
    pub const DISPATCH_ORDER: [RetrievalMethod; 3] = [
        RetrievalMethod::PortalScrape,
        RetrievalMethod::DocumentAnalysis,
        RetrievalMethod::ManualScript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PortalScrape => "PORTAL_SCRAPE",
            Self::DocumentAnalysis => "DOCUMENT_ANALYSIS",
            Self::ManualScript => "MANUAL_SCRIPT",
        }
    }
}

impl fmt::Display for RetrievalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetrievalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PORTAL_SCRAPE" => Ok(Self::PortalScrape),
            "DOCUMENT_ANALYSIS" => Ok(Self::DocumentAnalysis),
            "MANUAL_SCRIPT" => Ok(Self::ManualScript),
            other => Err(format!("unknown retrieval method: {other}")),
        }
    }
}

/// Letter grade for a completeness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.95 {
            Self::A
        } else if score >= 0.85 {
            Self::B
        } else if score >= 0.70 {
            Self::C
        } else if score >= 0.50 {
            Self::D
        } else {
            Self::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Fraction of tracked fields that are resolved. An empty registry scores 0.
#[allow(clippy::cast_precision_loss)]
pub fn completeness(present: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        present as f64 / total as f64
    }
}

/// Which source supplied a field's final value.
///
/// Serialized as `PRIMARY`, `SECONDARY:<METHOD>`, `INFERRED` or `MISSING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Provenance {
    Primary,
    Secondary(RetrievalMethod),
    Inferred,
    Missing,
}

impl Provenance {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("PRIMARY"),
            Self::Secondary(method) => write!(f, "SECONDARY:{method}"),
            Self::Inferred => f.write_str("INFERRED"),
            Self::Missing => f.write_str("MISSING"),
        }
    }
}

impl FromStr for Provenance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIMARY" => Ok(Self::Primary),
            "INFERRED" => Ok(Self::Inferred),
            "MISSING" => Ok(Self::Missing),
            other => match other.strip_prefix("SECONDARY:") {
                Some(method) => method.parse().map(Self::Secondary),
                None => Err(format!("unknown provenance: {other}")),
            },
        }
    }
}

/// Append-only, timestamped reasoning log.
///
/// Lines keep identifiers in clear text because the trail is returned to the
/// caller; the copy emitted to tracing goes through the redactor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditTrail(Vec<String>);

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        logger_redacted::redacted_info!("{}", message);
        self.0.push(format!("[{}] {}", Utc::now().format("%H:%M:%S"), message));
    }

    pub fn append(&mut self, other: &AuditTrail) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
