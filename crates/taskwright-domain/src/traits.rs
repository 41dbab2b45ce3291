//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::sync::Arc;

/// Trait for hosted text-completion models
///
/// Implemented by the infrastructure layer (taskwright-llm). Calls may be slow
/// and may fail; callers treat the provider as an opaque function.
pub trait TextCompletion {
    /// Error type for completion operations
    type Error;

    /// Send a rendered prompt and return the model's textual reply
    fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}

impl<T: TextCompletion + ?Sized> TextCompletion for Arc<T> {
    type Error = T::Error;

    fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).complete(prompt)
    }
}
