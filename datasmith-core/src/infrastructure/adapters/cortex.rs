// datasmith-core/src/infrastructure/adapters/cortex.rs

// Completion adapters. The Cortex bridge issues the completion call through
// the execution-provider port; it owns no connection of its own.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::CompletionService;
use crate::error::DatasmithError;
use crate::ports::QueryExecutor;

/// Snowflake Cortex adapter: completion as a warehouse query.
///
/// Fails open: any failure past the port boundary becomes descriptive
/// comment text so the transformation artifact degrades instead of the
/// whole generation request.
pub struct CortexCompletion<'a> {
    executor: &'a dyn QueryExecutor,
}

impl<'a> CortexCompletion<'a> {
    pub fn new(executor: &'a dyn QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl CompletionService for CortexCompletion<'_> {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, DatasmithError> {
        // Single quotes must be doubled inside the SQL string literal
        let escaped_prompt = prompt.replace('\'', "''");
        let sql = format!(
            "SELECT SNOWFLAKE.CORTEX.COMPLETE('{}', '{}') AS response",
            model, escaped_prompt
        );

        debug!(model, prompt_len = prompt.len(), "Issuing Cortex completion");

        let rows = match self.executor.execute_query(&sql).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Cortex completion failed");
                return Ok(format!("-- Error generating code: {}", e));
            }
        };

        let response = rows
            .first()
            .and_then(|row| row.get("RESPONSE").or_else(|| row.get("response")))
            .and_then(|value| value.as_str())
            .map(str::to_string);

        match response {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Ok("-- Error: No response from Cortex".to_string()),
        }
    }
}

/// Offline substitute used when no execution provider is wired in. Emits the
/// fixed marker so callers still receive a complete artifact set.
pub struct DisabledCompletion;

#[async_trait]
impl CompletionService for DisabledCompletion {
    async fn complete(&self, _prompt: &str, _model: &str) -> Result<String, DatasmithError> {
        Ok(
            "-- Cortex disabled. Enable Cortex LLM for full generation.\n-- Run the emitted prompt through your completion service to produce this model."
                .to_string(),
        )
    }
}
