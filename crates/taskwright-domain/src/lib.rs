//! Taskwright Domain Layer
//!
//! This crate contains the core value types shared by every other layer.
//! It keeps dependencies to the bare minimum and defines the task record,
//! the labelled fields a model reply is parsed into, and the trait interface
//! for the external text-completion collaborator.
//!
//! ## Key Concepts
//!
//! - **Task**: Immutable record produced by a successful extraction
//! - **Priority**: Closed `low | medium | high` scale
//! - **Field**: The fixed label set a model reply is expected to use
//! - **ExtractedFields**: Raw label/value mapping parsed from one reply
//!
//! ## Architecture
//!
//! - No I/O and no wall-clock access
//! - Trait definitions for all external interactions
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod field;
pub mod task;
pub mod traits;

// Re-exports for convenience
pub use field::{ExtractedFields, Field};
pub use task::{Priority, Task, TaskError};
pub use traits::TextCompletion;
