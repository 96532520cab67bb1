// datasmith-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(datasmith::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONTRACT / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(datasmith::infra::yaml),
        help("Check your contract YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Contract file not found at '{0}'")]
    #[diagnostic(code(datasmith::infra::contract_missing))]
    ContractNotFound(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(datasmith::infra::template),
        help("Check the embedded policy template syntax ({{ ... }}).")
    )]
    TemplateError(#[from] minijinja::Error),

    // --- EXTERNAL SERVICES (Warehouse / Completion) ---
    #[error("Query Execution Error: {0}")]
    #[diagnostic(
        code(datasmith::infra::query),
        help("The execution provider rejected the statement.")
    )]
    QueryError(String),
}
