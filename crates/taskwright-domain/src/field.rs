//! Field module - the labels a model reply is parsed into

use std::collections::BTreeMap;
use std::fmt;

/// A labelled field in a model reply
///
/// Labels are matched case-sensitively, exactly as the prompt spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Task category
    Type,

    /// Short task title
    Title,

    /// Longer description
    Description,

    /// `low`, `medium` or `high`
    Priority,

    /// Literal date or normalized relative phrase
    CompletionDate,

    /// Optional: whether the input describes a task at all
    Classification,

    /// Optional: the input with abbreviations and typos corrected
    Autocomplete,
}

impl Field {
    /// Fields every complete extraction must carry, in declaration order
    pub const REQUIRED: [Field; 5] = [
        Field::Type,
        Field::Title,
        Field::Description,
        Field::Priority,
        Field::CompletionDate,
    ];

    /// Get the label as it appears in model output
    pub fn label(&self) -> &'static str {
        match self {
            Field::Type => "Type",
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Priority => "Priority",
            Field::CompletionDate => "Completion Date",
            Field::Classification => "Classification",
            Field::Autocomplete => "Autocomplete",
        }
    }

    /// Look up a field by its exact label
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Type" => Some(Field::Type),
            "Title" => Some(Field::Title),
            "Description" => Some(Field::Description),
            "Priority" => Some(Field::Priority),
            "Completion Date" => Some(Field::CompletionDate),
            "Classification" => Some(Field::Classification),
            "Autocomplete" => Some(Field::Autocomplete),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw label/value pairs parsed from a single model reply
///
/// Unknown labels are kept alongside the known ones; they never influence
/// completeness. Inserting an existing label overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    values: BTreeMap<String, String>,
}

impl ExtractedFields {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under a raw label, replacing any previous value
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.values.insert(label.into(), value.into());
    }

    /// Store a value for a known field
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.insert(field.label(), value);
    }

    /// Value of a known field, if present
    pub fn get(&self, field: Field) -> Option<&str> {
        self.get_label(field.label())
    }

    /// Value stored under a raw label, if present
    pub fn get_label(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }

    /// Number of stored labels
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was parsed
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all stored label/value pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup_is_case_sensitive() {
        assert_eq!(Field::from_label("Completion Date"), Some(Field::CompletionDate));
        assert_eq!(Field::from_label("completion date"), None);
        assert_eq!(Field::from_label("TYPE"), None);
    }

    #[test]
    fn test_labels_resolve_back_to_fields() {
        let optional = [Field::Classification, Field::Autocomplete];
        for field in Field::REQUIRED.iter().chain(optional.iter()) {
            assert_eq!(Field::from_label(field.label()), Some(*field));
        }
    }

    #[test]
    fn test_required_order() {
        let labels: Vec<_> = Field::REQUIRED.iter().map(Field::label).collect();
        assert_eq!(
            labels,
            vec!["Type", "Title", "Description", "Priority", "Completion Date"]
        );
    }

    #[test]
    fn test_insert_overwrites() {
        let mut fields = ExtractedFields::new();
        fields.set(Field::Title, "first");
        fields.set(Field::Title, "second");
        assert_eq!(fields.get(Field::Title), Some("second"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_unknown_labels_are_kept() {
        let mut fields = ExtractedFields::new();
        fields.insert("Mood", "cheerful");
        assert_eq!(fields.get_label("Mood"), Some("cheerful"));
        assert_eq!(fields.get(Field::Type), None);
        assert_eq!(fields.iter().collect::<Vec<_>>(), vec![("Mood", "cheerful")]);
    }
}
