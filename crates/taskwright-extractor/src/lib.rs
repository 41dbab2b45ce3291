//! Taskwright Extractor
//!
//! Converts free-form natural-language input into a structured task using an
//! LLM plus deterministic post-processing.
//!
//! # Architecture
//!
//! ```text
//! Input → PromptBuilder → LLM → parse_response → DateResolver → check_completeness → Task | Message
//! ```
//!
//! The model only ever emits a literal date or a normalized phrase; date
//! arithmetic happens in [`DateResolver`] against an explicit anchor date.
//!
//! # Example Usage
//!
//! ```no_run
//! use taskwright_extractor::{ExtractionPipeline, ExtractorConfig};
//! use taskwright_llm::MockProvider;
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(
//!     "Type: Household Tasks\nTitle: Clean kitchen\nDescription: Clean the kitchen\n\
//!      Priority: low\nCompletion Date: tomorrow",
//! );
//! let pipeline = ExtractionPipeline::new(llm, ExtractorConfig::default())?;
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
//! let outcome = pipeline.run("clean the kitchen tomorrow", anchor).await;
//!
//! if let Some(task) = outcome.task() {
//!     println!("{} due {}", task.title(), task.completion_date());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod completeness;
mod config;
mod dates;
mod error;
mod parser;
mod pipeline;
mod prompt;
mod types;


pub use completeness::{check_completeness, is_resolved, Completeness, UNKNOWN_SENTINEL};
pub use config::{ConfigError, ExtractorConfig};
pub use dates::{is_iso_literal, DateResolution, DateResolver, SUPPORTED_PHRASES};
pub use error::{ExtractionError, MISSING_INFORMATION_PREFIX, RETRY_LATER_MESSAGE};
pub use parser::{parse_response, SEPARATOR};
pub use pipeline::ExtractionPipeline;
pub use prompt::{OptionalField, PromptBuilder, PromptSpec, DEFAULT_CATEGORIES};
pub use types::{serialize_task, ExtractionOutcome, Stage};
