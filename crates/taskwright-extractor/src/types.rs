//! Pipeline outcome types

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;
use taskwright_domain::Task;

/// Terminal state of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExtractionOutcome {
    /// A complete, validated task
    Task {
        /// The extracted task
        #[serde(serialize_with = "serialize_task")]
        task: Task,
    },

    /// A message for the user instead of a task
    Message {
        /// Human-readable text
        text: String,
    },
}

impl ExtractionOutcome {
    /// The task, if extraction succeeded
    pub fn task(&self) -> Option<&Task> {
        match self {
            ExtractionOutcome::Task { task } => Some(task),
            ExtractionOutcome::Message { .. } => None,
        }
    }

    /// The message, if extraction did not produce a task
    pub fn message(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Task { .. } => None,
            ExtractionOutcome::Message { text } => Some(text),
        }
    }
}

/// Stages a request passes through, for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Prompt rendered
    Built,
    /// Completion call issued and answered
    Invoked,
    /// Reply split into fields
    Parsed,
    /// Completion date normalized
    DateResolved,
    /// Completeness checked
    Validated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Built => "built",
            Stage::Invoked => "invoked",
            Stage::Parsed => "parsed",
            Stage::DateResolved => "date_resolved",
            Stage::Validated => "validated",
        };
        f.write_str(name)
    }
}

/// Serialize a task with wire field names (`type`, `completion_date`, ...)
pub fn serialize_task<S: Serializer>(task: &Task, serializer: S) -> Result<S::Ok, S::Error> {
    let extras = !task.extras().is_empty();
    let mut state = serializer.serialize_struct("Task", if extras { 6 } else { 5 })?;
    state.serialize_field("type", task.task_type())?;
    state.serialize_field("title", task.title())?;
    state.serialize_field("description", task.description())?;
    state.serialize_field("priority", task.priority().as_str())?;
    state.serialize_field("completion_date", &task.completion_date().to_rfc3339())?;
    if extras {
        state.serialize_field("extras", task.extras())?;
    }
    state.end()
}
