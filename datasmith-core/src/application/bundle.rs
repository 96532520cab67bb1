// datasmith-core/src/application/bundle.rs

// Use case: fan one contract model out to the four artifact generators.
// The three template generators are pure; only the completion call can
// suspend or fail, and its failure degrades the transformation artifact
// alone (partial success, never all-or-nothing).

use chrono::{DateTime, Utc};
use futures::StreamExt;
use tracing::warn;

use crate::application::masking::MaskingPolicyGenerator;
use crate::application::ports::CompletionService;
use crate::application::prompt::TransformationPromptBuilder;
use crate::application::quality::QualityRuleGenerator;
use crate::application::schema_manifest::SchemaManifestGenerator;
use crate::domain::contract::ContractModel;
use crate::error::DatasmithError;

/// Bounded concurrency for batch generation.
const BATCH_WIDTH: usize = 4;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Completion model identifier forwarded to the collaborator.
    pub model: String,
    /// Pinned generation timestamp; the only non-derived input of the
    /// template generators.
    pub generated_at: DateTime<Utc>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet".to_string(),
            generated_at: Utc::now(),
        }
    }
}

/// The four generated texts for one contract.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactBundle {
    /// Lower-cased target table name, used for the model file name.
    pub model_name: String,
    pub transformation: String,
    pub schema_manifest: String,
    pub masking_policies: String,
    pub quality_rules: String,
}

/// Generate all four artifacts for a contract.
pub async fn generate_bundle(
    contract: &ContractModel,
    completion: &dyn CompletionService,
    options: &GenerateOptions,
) -> Result<ArtifactBundle, DatasmithError> {
    let stamp = options.generated_at.to_rfc3339();

    let schema_manifest = SchemaManifestGenerator::generate(contract)?;
    let masking_policies = MaskingPolicyGenerator::generate(contract, &stamp)?;
    let quality_rules = QualityRuleGenerator::generate(contract, &stamp);

    let prompt = TransformationPromptBuilder::build(contract);
    let transformation = match completion.complete(&prompt, &options.model).await {
        Ok(text) => text,
        Err(e) => {
            // Fault isolation: the other three artifacts stand on their own.
            warn!(contract = %contract.name, error = %e, "Completion failed, emitting inline marker");
            format!("-- Error generating code: {}", e)
        }
    };

    let model_name = if contract.target.table.is_empty() {
        "model".to_string()
    } else {
        contract.target.table.to_lowercase()
    };

    Ok(ArtifactBundle {
        model_name,
        transformation,
        schema_manifest,
        masking_policies,
        quality_rules,
    })
}

/// Generate bundles for several contracts with bounded concurrency.
/// Results carry the contract name; completion order is not guaranteed.
pub async fn generate_batch(
    contracts: &[ContractModel],
    completion: &dyn CompletionService,
    options: &GenerateOptions,
) -> Vec<(String, Result<ArtifactBundle, DatasmithError>)> {
    let jobs = contracts.iter().map(|contract| async move {
        let result = generate_bundle(contract, completion, options).await;
        (contract.name.clone(), result)
    });

    futures::stream::iter(jobs)
        .buffer_unordered(BATCH_WIDTH)
        .collect()
        .await
}
