// datasmith-core/src/application/schema_manifest.rs

use serde::Serialize;

use crate::domain::contract::ContractModel;
use crate::domain::error::DomainError;
use crate::error::DatasmithError;

// --- DTOs (Data Transfer Objects) ---
// These structures define exactly what lands in schema.yml. Field order
// follows the contract model, not the alphabet, so regenerations diff
// cleanly.

#[derive(Serialize)]
struct SourcesDoc {
    version: u8,
    sources: Vec<SourceGroup>,
}

#[derive(Serialize)]
struct SourceGroup {
    name: String,
    database: String,
    schema: String,
    tables: Vec<SourceTableEntry>,
}

#[derive(Serialize)]
struct SourceTableEntry {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
}

#[derive(Serialize)]
struct ModelsDoc {
    version: u8,
    models: Vec<ModelEntry>,
}

#[derive(Serialize)]
struct ModelEntry {
    name: String,
    description: String,
    config: ModelConfigEntry,
    meta: ModelMeta,
    columns: Vec<ColumnEntry>,
}

#[derive(Serialize)]
struct ModelConfigEntry {
    materialized: String,
    tags: Vec<String>,
}

#[derive(Serialize)]
struct ModelMeta {
    owner: String,
    sla: String,
    contract_version: String,
}

#[derive(Serialize)]
struct ColumnEntry {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

const BANNER: &str =
    "# ============================================================================";

// --- GENERATOR SERVICE ---

pub struct SchemaManifestGenerator;

impl SchemaManifestGenerator {
    /// Emit the dbt schema.yml manifest (sources + model documentation and
    /// tests) for a contract.
    pub fn generate(contract: &ContractModel) -> Result<String, DatasmithError> {
        let sources = SourcesDoc {
            version: 2,
            sources: vec![SourceGroup {
                name: "raw".to_string(),
                database: contract.target.database.clone(),
                schema: "RAW".to_string(),
                tables: contract
                    .source_tables
                    .iter()
                    .map(|table| SourceTableEntry {
                        name: table.name.to_lowercase(),
                        description: table.description.clone(),
                    })
                    .collect(),
            }],
        };

        let models = ModelsDoc {
            version: 2,
            models: vec![ModelEntry {
                name: contract.target.table.to_lowercase(),
                description: contract.description.clone(),
                config: ModelConfigEntry {
                    materialized: contract.target.materialization.clone(),
                    tags: vec![
                        "data_product".to_string(),
                        "generated_from_contract".to_string(),
                    ],
                },
                meta: ModelMeta {
                    owner: contract.owner.email.clone(),
                    sla: contract.sla.data_freshness.clone(),
                    contract_version: contract.version.clone(),
                },
                columns: contract.columns.iter().map(|c| column_entry(contract, c)).collect(),
            }],
        };

        let sources_yaml = to_yaml("schema.yml", &sources)?;
        let models_yaml = to_yaml("schema.yml", &models)?;

        let mut out = String::new();
        out.push_str(BANNER);
        out.push_str("\n# SOURCES\n");
        out.push_str(BANNER);
        out.push('\n');
        out.push_str(&sources_yaml);
        out.push_str("\n\n");
        out.push_str(BANNER);
        out.push_str("\n# MODELS\n");
        out.push_str(BANNER);
        out.push('\n');
        out.push_str(&models_yaml);

        Ok(out)
    }
}

/// Column entry with contract-driven test assignment: the primary key gets
/// uniqueness + not-null, any other required column gets not-null only.
fn column_entry(contract: &ContractModel, column: &crate::domain::contract::ColumnSpec) -> ColumnEntry {
    let mut tests = Vec::new();
    if !contract.primary_key.is_empty() && column.name == contract.primary_key {
        tests.push("unique".to_string());
        tests.push("not_null".to_string());
    } else if column.required {
        tests.push("not_null".to_string());
    }

    ColumnEntry {
        name: column.name.clone(),
        description: column.description.clone(),
        tests,
        tags: column.tags.clone(),
    }
}

fn to_yaml<T: Serialize>(artifact: &str, value: &T) -> Result<String, DatasmithError> {
    serde_yaml::to_string(value).map_err(|e| {
        DatasmithError::Domain(DomainError::ArtifactError {
            artifact: artifact.to_string(),
            reason: e.to_string(),
        })
    })
}
