//! Completeness check over parsed fields

use taskwright_domain::{ExtractedFields, Field};

/// Value the model writes for a field it could not determine
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Result of a completeness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completeness {
    /// Every required field is present and resolved
    Complete,

    /// Fields that are absent or `unknown`, in declaration order
    Missing(Vec<Field>),
}

impl Completeness {
    /// Whether nothing is missing
    pub fn is_complete(&self) -> bool {
        matches!(self, Completeness::Complete)
    }
}

/// Whether `value` carries real content rather than the `unknown` sentinel
pub fn is_resolved(value: &str) -> bool {
    !value.trim().eq_ignore_ascii_case(UNKNOWN_SENTINEL)
}

/// Check `fields` against `required`
///
/// A field counts as missing when its label is absent or its value is
/// `unknown` (trimmed, any case). Missing fields keep the order of `required`.
pub fn check_completeness(fields: &ExtractedFields, required: &[Field]) -> Completeness {
    let missing: Vec<Field> = required
        .iter()
        .copied()
        .filter(|field| !fields.get(*field).is_some_and(is_resolved))
        .collect();

    if missing.is_empty() {
        Completeness::Complete
    } else {
        Completeness::Missing(missing)
    }
}
