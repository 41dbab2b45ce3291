//! LLM prompt engineering for task extraction
//!
//! The instruction text is generated from a [`PromptSpec`], so adding an
//! optional field or changing the category list never means editing a
//! hand-written template.

use crate::dates::SUPPORTED_PHRASES;
use crate::completeness::UNKNOWN_SENTINEL;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskwright_domain::{Field, Priority};

/// Default task categories offered to the model
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Household Tasks",
    "Work/Professional Tasks",
    "Personal Tasks",
    "Errands",
    "Family and Social Tasks",
    "Health and Wellness",
    "Financial Tasks",
    "Educational/Skill Development",
    "Travel and Leisure",
    "Miscellaneous",
];

/// Fields a prompt may request in addition to the required ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionalField {
    /// Whether the input describes a task at all
    Classification,
    /// The input with abbreviations, slang and typos corrected
    Autocomplete,
}

impl OptionalField {
    /// The domain field this maps to
    pub fn field(&self) -> Field {
        match self {
            OptionalField::Classification => Field::Classification,
            OptionalField::Autocomplete => Field::Autocomplete,
        }
    }
}

/// What the prompt asks the model for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSpec {
    /// Closed set of task categories
    pub categories: Vec<String>,

    /// Optional fields requested after the required ones
    pub optional_fields: Vec<OptionalField>,
}

impl Default for PromptSpec {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            optional_fields: Vec::new(),
        }
    }
}

impl PromptSpec {
    /// Request an additional optional field
    pub fn with_optional_field(mut self, field: OptionalField) -> Self {
        if !self.optional_fields.contains(&field) {
            self.optional_fields.push(field);
        }
        self
    }

    /// Every field the model is asked to emit, required ones first
    pub fn output_fields(&self) -> Vec<Field> {
        Field::REQUIRED
            .iter()
            .copied()
            .chain(self.optional_fields.iter().map(OptionalField::field))
            .collect()
    }

    fn describe(&self, field: Field) -> String {
        match field {
            Field::Type => "The category of the task, exactly one from the list above".to_string(),
            Field::Title => "A brief, clear title for the task".to_string(),
            Field::Description => "A detailed description of the task".to_string(),
            Field::Priority => {
                let names: Vec<_> = Priority::ALL.iter().map(Priority::as_str).collect();
                format!("One of {}", names.join(", "))
            }
            Field::CompletionDate => {
                "When the task needs to be completed, following the date rules below".to_string()
            }
            Field::Classification => {
                "Task if the input describes something to do, otherwise Conversation".to_string()
            }
            Field::Autocomplete => {
                "The user's input with abbreviations, slang, incomplete words and grammar corrected"
                    .to_string()
            }
        }
    }
}

/// Builds prompts for the LLM to extract a task
pub struct PromptBuilder<'a> {
    spec: &'a PromptSpec,
    input: String,
    anchor: NaiveDate,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for one request
    pub fn new(spec: &'a PromptSpec, input: impl Into<String>, anchor: NaiveDate) -> Self {
        Self {
            spec,
            input: input.into(),
            anchor,
        }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role
        prompt.push_str(ROLE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Category vocabulary
        prompt.push_str("Task categories:\n");
        for category in &self.spec.categories {
            prompt.push_str(&format!("- {}\n", category));
        }
        prompt.push('\n');

        // 3. Fields
        prompt.push_str("Extract the following information:\n");
        for field in self.spec.output_fields() {
            prompt.push_str(&format!("- {}: {}\n", field.label(), self.spec.describe(field)));
        }
        prompt.push('\n');

        // 4. Date rules
        prompt.push_str("Date rules:\n");
        prompt.push_str(&format!(
            "- Current date: {} ({})\n",
            self.anchor.format("%Y-%m-%d"),
            self.anchor.format("%A")
        ));
        prompt.push_str("- Do not calculate dates yourself.\n");
        prompt.push_str(
            "- If the user names an exact calendar date, write it as YYYY-MM-DD \
             (YYYY-MM-DDTHH:MM when a time of day is given).\n",
        );
        prompt.push_str("- Otherwise write exactly one of these phrases: ");
        prompt.push_str(&SUPPORTED_PHRASES.join(", "));
        prompt.push_str(" (N is a whole number).\n");
        prompt.push_str(&format!(
            "- If no completion date can be determined, write {}.\n\n",
            UNKNOWN_SENTINEL
        ));

        // 5. Missing information
        prompt.push_str(&format!(
            "If any field cannot be determined from the input, write {} as its value. Do not guess.\n\n",
            UNKNOWN_SENTINEL
        ));

        // 6. The text to analyze
        prompt.push_str("User input:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.input);
        prompt.push_str("\n---\n\n");

        // 7. Output format reminder
        prompt.push_str("Reply with exactly these lines and nothing else:\n");
        for field in self.spec.output_fields() {
            prompt.push_str(&format!("{}: <value>\n", field.label()));
        }

        prompt
    }
}

const ROLE_INSTRUCTIONS: &str = "You are an assistant for a task management application. \
Extract a single task from the user's input. Be precise and do not add pleasantries.";
