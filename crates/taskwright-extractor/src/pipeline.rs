//! Core extraction pipeline

use crate::completeness::{check_completeness, is_resolved, Completeness};
use crate::config::{ConfigError, ExtractorConfig};
use crate::dates::{DateResolution, DateResolver};
use crate::error::ExtractionError;
use crate::parser::parse_response;
use crate::prompt::{PromptBuilder, PromptSpec};
use crate::types::{ExtractionOutcome, Stage};
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use taskwright_domain::{ExtractedFields, Field, Priority, Task, TextCompletion};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Turns free-form input into a [`Task`] or a message for the user
///
/// Holds no per-request state; one pipeline can serve concurrent requests.
pub struct ExtractionPipeline<L>
where
    L: TextCompletion,
{
    llm_provider: Arc<L>,
    prompt: PromptSpec,
    resolver: DateResolver,
    completion_timeout: Duration,
}

impl<L> ExtractionPipeline<L>
where
    L: TextCompletion + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new pipeline
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ConfigError> {
        Self::with_shared_provider(Arc::new(llm_provider), config)
    }

    /// Create a new pipeline around a provider that is already shared
    pub fn with_shared_provider(
        llm_provider: Arc<L>,
        config: ExtractorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let resolver = DateResolver::new(config.timezone()?);

        Ok(Self {
            llm_provider,
            resolver,
            completion_timeout: config.completion_timeout(),
            prompt: config.prompt,
        })
    }

    /// The prompt settings in use
    pub fn prompt(&self) -> &PromptSpec {
        &self.prompt
    }

    /// The date resolver in use
    pub fn resolver(&self) -> &DateResolver {
        &self.resolver
    }

    /// Run one extraction anchored at `anchor`
    ///
    /// Never fails: transport faults, missing fields and unclear dates all
    /// come back as [`ExtractionOutcome::Message`].
    pub async fn run(&self, raw_input: &str, anchor: NaiveDate) -> ExtractionOutcome {
        match self.extract(raw_input, anchor).await {
            Ok(task) => {
                info!(
                    task_type = task.task_type(),
                    priority = %task.priority(),
                    completion_date = %task.completion_date(),
                    "Extracted task"
                );
                ExtractionOutcome::Task { task }
            }
            Err(e) => {
                match &e {
                    ExtractionError::TransportFault(_) => warn!("Extraction aborted: {}", e),
                    _ => info!("Extraction needs follow-up: {}", e),
                }
                ExtractionOutcome::Message {
                    text: e.user_message(),
                }
            }
        }
    }

    /// Run one extraction, keeping the failure reason
    pub async fn extract(
        &self,
        raw_input: &str,
        anchor: NaiveDate,
    ) -> Result<Task, ExtractionError> {
        let prompt = PromptBuilder::new(&self.prompt, raw_input, anchor).build();
        debug!(stage = %Stage::Built, prompt_len = prompt.len(), "Formatted prompt: {}", prompt);

        let reply = timeout(self.completion_timeout, self.call_llm(prompt))
            .await
            .map_err(|_| ExtractionError::TransportFault("completion timed out".to_string()))??;
        debug!(stage = %Stage::Invoked, "LLM output: {}", reply);

        let mut fields = parse_response(&reply);
        debug!(stage = %Stage::Parsed, fields = ?fields, "Extracted fields");

        let completion_date = self.resolve_completion_date(&mut fields, anchor)?;
        debug!(stage = %Stage::DateResolved, completion_date = ?completion_date);

        if let Completeness::Missing(missing) = check_completeness(&fields, &Field::REQUIRED) {
            return Err(ExtractionError::IncompleteExtraction(missing));
        }
        debug!(stage = %Stage::Validated, "All required fields present");

        self.build_task(&fields, completion_date)
    }

    /// Normalize the completion date in place
    ///
    /// Absent or `unknown` dates are left for the completeness check.
    fn resolve_completion_date(
        &self,
        fields: &mut ExtractedFields,
        anchor: NaiveDate,
    ) -> Result<Option<DateTime<FixedOffset>>, ExtractionError> {
        let Some(raw) = fields
            .get(Field::CompletionDate)
            .filter(|value| is_resolved(value))
            .map(str::to_string)
        else {
            return Ok(None);
        };

        match self.resolver.resolve(&raw, anchor) {
            DateResolution::Resolved(date) => {
                fields.set(Field::CompletionDate, date.to_rfc3339());
                Ok(Some(date))
            }
            DateResolution::Unclear => Err(ExtractionError::UnclearDate(raw)),
        }
    }

    fn build_task(
        &self,
        fields: &ExtractedFields,
        completion_date: Option<DateTime<FixedOffset>>,
    ) -> Result<Task, ExtractionError> {
        let value = |field: Field| fields.get(field).unwrap_or_default();

        let priority = Priority::parse(value(Field::Priority));
        let (Some(priority), Some(completion_date)) = (priority, completion_date) else {
            let mut missing = Vec::new();
            if priority.is_none() {
                missing.push(Field::Priority);
            }
            if completion_date.is_none() {
                missing.push(Field::CompletionDate);
            }
            return Err(ExtractionError::IncompleteExtraction(missing));
        };

        let extras: BTreeMap<String, String> = self
            .prompt
            .optional_fields
            .iter()
            .filter_map(|optional| {
                let field = optional.field();
                fields
                    .get(field)
                    .filter(|v| is_resolved(v))
                    .map(|v| (field.label().to_string(), v.to_string()))
            })
            .collect();

        Task::new(
            value(Field::Type),
            value(Field::Title),
            value(Field::Description),
            priority,
            completion_date,
        )
        .map(|task| task.with_extras(extras))
        .map_err(|_| ExtractionError::IncompleteExtraction(vec![Field::Type]))
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, ExtractionError> {
        let llm = Arc::clone(&self.llm_provider);

        // Call in a blocking context since TextCompletion is not async
        tokio::task::spawn_blocking(move || {
            llm.complete(&prompt)
                .map_err(|e| ExtractionError::TransportFault(e.to_string()))
        })
        .await
        .map_err(|e| ExtractionError::TransportFault(format!("Task join error: {}", e)))?
    }
}
