//! Task module - the record a successful extraction produces

use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    /// Can wait
    Low,

    /// Default urgency
    Medium,

    /// Needs attention first
    High,
}

impl Priority {
    /// All priorities, lowest first
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Get the priority name as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid priority: {}", s))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a task record would violate its invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Category label is empty
    #[error("task type must not be empty")]
    EmptyType,
}

/// An extracted task
///
/// Immutable once built; each request yields a fresh instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    task_type: String,
    title: String,
    description: String,
    priority: Priority,
    completion_date: DateTime<FixedOffset>,
    extras: BTreeMap<String, String>,
}

impl Task {
    /// Create a new task
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::EmptyType`] if the category label is blank.
    pub fn new(
        task_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        completion_date: DateTime<FixedOffset>,
    ) -> Result<Self, TaskError> {
        let task_type = task_type.into();
        if task_type.trim().is_empty() {
            return Err(TaskError::EmptyType);
        }

        Ok(Self {
            task_type,
            title: title.into(),
            description: description.into(),
            priority,
            completion_date,
            extras: BTreeMap::new(),
        })
    }

    /// Attach optional fields (e.g. Autocomplete) emitted alongside the task
    pub fn with_extras(mut self, extras: BTreeMap<String, String>) -> Self {
        self.extras = extras;
        self
    }

    /// Category label
    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// Short title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Longer description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Priority
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Completion date, localized to the resolver's fixed zone
    pub fn completion_date(&self) -> DateTime<FixedOffset> {
        self.completion_date
    }

    /// Optional fields keyed by label
    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn midnight() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 28, 0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_priority_parse_ignores_case() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse(" Medium "), Some(Priority::Medium));
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_display() {
        let names: Vec<_> = Priority::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["low", "medium", "high"]);
    }

    #[test]
    fn test_task_rejects_blank_type() {
        let result = Task::new("  ", "Title", "Desc", Priority::Low, midnight());
        assert_eq!(result.unwrap_err(), TaskError::EmptyType);
    }

    #[test]
    fn test_task_accessors() {
        let mut extras = BTreeMap::new();
        extras.insert("Autocomplete".to_string(), "clean the kitchen".to_string());

        let task = Task::new("Household", "Clean kitchen", "Clean it", Priority::Low, midnight())
            .unwrap()
            .with_extras(extras);

        assert_eq!(task.task_type(), "Household");
        assert_eq!(task.title(), "Clean kitchen");
        assert_eq!(task.description(), "Clean it");
        assert_eq!(task.priority(), Priority::Low);
        assert_eq!(task.completion_date(), midnight());
        assert_eq!(task.extras().get("Autocomplete").unwrap(), "clean the kitchen");
    }
}
