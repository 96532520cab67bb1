// datasmith-core/src/application/ports/completion.rs

use crate::error::DatasmithError;
use async_trait::async_trait;

/// Port for the external text-completion collaborator.
///
/// The core treats the returned text as opaque and untrusted: it is never
/// validated, parsed or repaired, only passed through into the
/// transformation artifact. Adapters are expected to fail open (descriptive
/// text instead of an error) wherever they can.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, DatasmithError>;
}
