//! Parse LLM output into labelled fields

use taskwright_domain::{ExtractedFields, Field};
use tracing::debug;

/// Separator between a label and its value
pub const SEPARATOR: char = ':';

/// Parse a model reply of `Label: value` lines
///
/// Only the first separator on a line splits it, so values may themselves
/// contain `:`. Lines without a separator (blank lines, prose, code fences)
/// are skipped. A label seen twice keeps its last value.
pub fn parse_response(reply: &str) -> ExtractedFields {
    let mut fields = ExtractedFields::new();
    let mut skipped = 0usize;

    for line in reply.lines() {
        let Some((label, value)) = line.split_once(SEPARATOR) else {
            if !line.trim().is_empty() {
                skipped += 1;
            }
            continue;
        };

        let label = label.trim();
        if label.is_empty() {
            skipped += 1;
            continue;
        }

        fields.insert(label, value.trim());
    }

    let unrecognized = fields
        .iter()
        .filter(|(label, _)| Field::from_label(label).is_none())
        .count();
    debug!(parsed = fields.len(), unrecognized, skipped, "Parsed model reply");

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_reply() {
        let fields = parse_response("Type: Work\nTitle: Fix: bug\n");
        assert_eq!(fields.get(Field::Type), Some("Work"));
        assert_eq!(fields.get(Field::Title), Some("Fix: bug"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_parse_full_reply() {
        let reply = "Type: Household\n\
                     Title: Clean kitchen\n\
                     Description: Clean the kitchen\n\
                     Priority: low\n\
                     Completion Date: tomorrow";
        let fields = parse_response(reply);

        assert_eq!(fields.get(Field::Type), Some("Household"));
        assert_eq!(fields.get(Field::Description), Some("Clean the kitchen"));
        assert_eq!(fields.get(Field::Priority), Some("low"));
        assert_eq!(fields.get(Field::CompletionDate), Some("tomorrow"));
    }

    #[test]
    fn test_blank_and_prose_lines_ignored() {
        let reply = "Here is the task\n\n   \nType: Errands\n```\n";
        let fields = parse_response(reply);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(Field::Type), Some("Errands"));
    }

    #[test]
    fn test_last_occurrence_wins() {
        let fields = parse_response("Priority: low\nPriority: high");
        assert_eq!(fields.get(Field::Priority), Some("high"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let fields = parse_response("   Title   :   Call mom  \r\n");
        assert_eq!(fields.get(Field::Title), Some("Call mom"));
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let fields = parse_response("type: Work\nTYPE: Personal");
        assert_eq!(fields.get(Field::Type), None);
        assert_eq!(fields.get_label("type"), Some("Work"));
    }

    #[test]
    fn test_extra_fields_kept() {
        let fields = parse_response("Notes: bring gloves\nType: Household");
        assert_eq!(fields.get_label("Notes"), Some("bring gloves"));
        assert_eq!(fields.get(Field::Type), Some("Household"));
    }

    #[test]
    fn test_empty_label_and_empty_value() {
        let fields = parse_response(": orphan\nDescription:");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(Field::Description), Some(""));
    }

    #[test]
    fn test_time_values_preserved() {
        let fields = parse_response("Completion Date: 2024-06-28 10:30");
        assert_eq!(fields.get(Field::CompletionDate), Some("2024-06-28 10:30"));
    }

    #[test]
    fn test_empty_reply() {
        assert!(parse_response("").is_empty());
    }
}
