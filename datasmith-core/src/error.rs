// datasmith-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasmithError {
    // --- DOMAIN ERRORS (Contract semantics, artifact assembly) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing, External services) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATIVE ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Manual implementations to avoid duplicate enum variants but keep ergonomics
// (e.g. `?` operator on IO / YAML / template calls)
impl From<std::io::Error> for DatasmithError {
    fn from(err: std::io::Error) -> Self {
        DatasmithError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<serde_yaml::Error> for DatasmithError {
    fn from(err: serde_yaml::Error) -> Self {
        DatasmithError::Infrastructure(InfrastructureError::YamlError(err))
    }
}

impl From<minijinja::Error> for DatasmithError {
    fn from(err: minijinja::Error) -> Self {
        DatasmithError::Infrastructure(InfrastructureError::TemplateError(err))
    }
}
