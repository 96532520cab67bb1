// datasmith-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Artifact assembly failed for '{artifact}': {reason}")]
    #[diagnostic(
        code(datasmith::domain::artifact),
        help("The contract model could not be rendered into this artifact.")
    )]
    ArtifactError { artifact: String, reason: String },

    #[error("Contract Error: {0}")]
    #[diagnostic(code(datasmith::domain::contract))]
    ContractError(String),
}
