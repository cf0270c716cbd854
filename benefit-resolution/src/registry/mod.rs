//! Field registry: the static, versioned table of benefit-field descriptors.
//!
//! The registry is parsed from YAML once at startup, validated, and shared as
//! `Arc<FieldRegistry>`. There is no mutation API.

mod fields;
mod path;

pub use fields::BenefitField;
pub use path::DocumentPath;

use crate::error::RegistryError;
use crate::models::{Criticality, RetrievalMethod};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const BUILTIN_DENTAL_REGISTRY: &str = include_str!("dental_v1.yaml");

/// Registry document version this build understands
pub const SUPPORTED_REGISTRY_VERSION: u32 = 1;

const WILDCARD: &str = "*";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDefinition {
    version: u32,
    name: String,
    fields: Vec<FieldDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDefinition {
    path: String,
    label: String,
    criticality: Criticality,
    procedures: Vec<String>,
    preferred_method: RetrievalMethod,
    #[serde(default)]
    fallback_method: Option<RetrievalMethod>,
}

/// Today's scheduled procedures, lowercased once per evaluation.
///
/// Entries are kept verbatim otherwise: an empty description is contained in
/// every matcher, so it makes every field relevant.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    items: Vec<String>,
}

impl Schedule {
    pub fn new<S: AsRef<str>>(descriptions: &[S]) -> Self {
        let items = descriptions
            .iter()
            .map(|d| d.as_ref().to_lowercase())
            .collect();
        Self { items }
    }
}

/// Which procedures make a field relevant to today's visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcedureMatchers {
    /// Always relevant
    Any,
    /// Relevant when a scheduled description contains, or is contained by,
    /// one of these lowercase matchers
    Matching(Vec<String>),
}

impl ProcedureMatchers {
    fn from_definition(path: &str, procedures: &[String]) -> Result<Self, RegistryError> {
        if procedures.iter().any(|p| p.trim() == WILDCARD) {
            return Ok(Self::Any);
        }
        if procedures.is_empty() || procedures.iter().any(|p| p.trim().is_empty()) {
            return Err(RegistryError::EmptyMatcher(path.to_string()));
        }
        Ok(Self::Matching(
            procedures.iter().map(|p| p.trim().to_lowercase()).collect(),
        ))
    }

    pub fn matches(&self, schedule: &Schedule) -> bool {
        match self {
            Self::Any => true,
            Self::Matching(matchers) => matchers.iter().any(|matcher| {
                schedule
                    .items
                    .iter()
                    .any(|item| item.contains(matcher.as_str()) || matcher.contains(item.as_str()))
            }),
        }
    }
}

impl Serialize for ProcedureMatchers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => [WILDCARD].serialize(serializer),
            Self::Matching(matchers) => matchers.serialize(serializer),
        }
    }
}

/// One tracked benefit field
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "path")]
    pub field: BenefitField,
    pub label: String,
    pub criticality: Criticality,
    pub procedures: ProcedureMatchers,
    pub preferred_method: RetrievalMethod,
    pub fallback_method: Option<RetrievalMethod>,
    #[serde(skip)]
    accessor: DocumentPath,
}

impl FieldDescriptor {
    pub fn new(
        field: BenefitField,
        label: impl Into<String>,
        criticality: Criticality,
        procedures: ProcedureMatchers,
        preferred_method: RetrievalMethod,
        fallback_method: Option<RetrievalMethod>,
    ) -> Self {
        Self {
            field,
            label: label.into(),
            criticality,
            procedures,
            preferred_method,
            fallback_method,
            accessor: DocumentPath::new(field.path()),
        }
    }

    pub fn path(&self) -> &'static str {
        self.field.path()
    }

    pub fn accessor(&self) -> &DocumentPath {
        &self.accessor
    }

    pub fn is_relevant(&self, schedule: &Schedule) -> bool {
        self.procedures.matches(schedule)
    }
}

/// Immutable, validated set of field descriptors in declaration order
#[derive(Debug)]
pub struct FieldRegistry {
    name: String,
    version: u32,
    descriptors: Vec<Arc<FieldDescriptor>>,
}

impl FieldRegistry {
    /// The built-in dental verification registry
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_yaml(BUILTIN_DENTAL_REGISTRY)
    }

    pub fn load_file(path: &Path) -> Result<Self, RegistryError> {
        let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    /// Load from `path` when given, otherwise the built-in registry.
    pub fn load(path: Option<&Path>) -> Result<Self, RegistryError> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::builtin(),
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self, RegistryError> {
        let definition: RegistryDefinition = serde_yaml::from_str(source)?;
        if definition.version != SUPPORTED_REGISTRY_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: definition.version,
                supported: SUPPORTED_REGISTRY_VERSION,
            });
        }

        let descriptors = definition
            .fields
            .into_iter()
            .map(|entry| {
                let field: BenefitField = entry
                    .path
                    .parse()
                    .map_err(|_| RegistryError::UnknownField(entry.path.clone()))?;
                let procedures = ProcedureMatchers::from_definition(&entry.path, &entry.procedures)?;
                Ok(FieldDescriptor::new(
                    field,
                    entry.label,
                    entry.criticality,
                    procedures,
                    entry.preferred_method,
                    entry.fallback_method,
                ))
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        let registry = Self::from_descriptors(definition.name, descriptors)?;
        registry.log_summary();
        Ok(registry)
    }

    /// Build a registry from already-constructed descriptors.
    pub fn from_descriptors(
        name: impl Into<String>,
        descriptors: Vec<FieldDescriptor>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if descriptors.is_empty() {
            return Err(RegistryError::Empty(name));
        }

        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.field) {
                return Err(RegistryError::DuplicatePath(descriptor.path().to_string()));
            }
        }

        Ok(Self {
            name,
            version: SUPPORTED_REGISTRY_VERSION,
            descriptors: descriptors.into_iter().map(Arc::new).collect(),
        })
    }

    fn log_summary(&self) {
        info!(
            registry = %self.name,
            version = self.version,
            fields = self.descriptors.len(),
            critical = self.count(Criticality::Critical),
            important = self.count(Criticality::Important),
            nice_to_have = self.count(Criticality::NiceToHave),
            "Field registry loaded"
        );
    }

    /// Ordered descriptor sequence
    pub fn lookup(&self) -> &[Arc<FieldDescriptor>] {
        &self.descriptors
    }

    pub fn get(&self, field: BenefitField) -> Option<&Arc<FieldDescriptor>> {
        self.descriptors.iter().find(|d| d.field == field)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn count(&self, criticality: Criticality) -> usize {
        self.descriptors
            .iter()
            .filter(|d| d.criticality == criticality)
            .count()
    }
}
