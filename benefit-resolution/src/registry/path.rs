use serde_json::Value;
use std::fmt;

/// Pre-split dotted path into a nested eligibility document.
///
/// Traversal is safe: a missing intermediate key or a non-object along the
/// way resolves to `None`, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    raw: &'static str,
    segments: Vec<&'static str>,
}

impl DocumentPath {
    pub fn new(raw: &'static str) -> Self {
        Self {
            raw,
            segments: raw.split('.').collect(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.raw
    }

    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(document, |node, segment| node.as_object()?.get(*segment))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_resolution() {
        let doc = json!({ "frequency_limits": { "D1110": { "times_per_period": 2 } } });
        let path = DocumentPath::new("frequency_limits.D1110");
        assert_eq!(path.resolve(&doc), Some(&json!({ "times_per_period": 2 })));
    }

    #[test]
    fn test_missing_intermediate_is_absent() {
        let doc = json!({ "coverage_pct": 80 });
        assert_eq!(DocumentPath::new("coverage_pct.basic").resolve(&doc), None);
        assert_eq!(DocumentPath::new("waiting_period.major").resolve(&doc), None);
    }

    #[test]
    fn test_arrays_are_not_traversed() {
        let doc = json!({ "frequency_limits": [{ "D1110": 1 }] });
        assert_eq!(DocumentPath::new("frequency_limits.D1110").resolve(&doc), None);
    }
}
