// datasmith-core/src/domain/contract/model.rs

use serde::Serialize;

/// The normalized, fully-populated view of a parsed data contract.
///
/// Built once per generation request by the extractor, read-only afterwards.
/// Every field carries a default so the model is always complete even when
/// the input document is partial; the generators never have to re-check for
/// missing sections.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ContractModel {
    // --- Identity ---
    pub name: String,
    pub version: String,
    pub title: String,
    pub description: String,
    pub owner: Owner,

    // --- Topology ---
    pub source_tables: Vec<SourceTable>,
    pub target: TargetRef,

    // --- Shape ---
    pub columns: Vec<ColumnSpec>,
    pub grain: String,
    /// May be empty. When set it is expected to name a column, but this is
    /// not enforced (permissive model).
    pub primary_key: String,

    // --- Governance ---
    pub data_quality: DataQualitySpec,
    pub masking_policies: Vec<MaskingPolicy>,
    pub access_control: AccessControl,
    pub sla: Sla,
}

impl ContractModel {
    /// Fully qualified target table identifier (database.schema.table).
    pub fn qualified_target(&self) -> String {
        format!(
            "{}.{}.{}",
            self.target.database, self.target.schema, self.target.table
        )
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// Upstream table in the uniform structured shape. Legacy all-string entries
/// are wrapped into this shape by the extractor.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub name: String,
    pub location: String,
    pub description: String,
    pub key_columns: Vec<String>,
    pub filter: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TargetRef {
    pub database: String,
    pub schema: String,
    pub table: String,
    pub materialization: String,
}

impl Default for TargetRef {
    fn default() -> Self {
        Self {
            database: String::new(),
            schema: String::new(),
            table: String::new(),
            materialization: "table".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
    pub description: String,
    /// Free-text derivation logic; falls back to the legacy `source` field.
    pub derivation: String,
    pub required: bool,
    pub pii: bool,
    pub tags: Vec<String>,
    pub masking_policy: String,
    /// Raw `constraints` mapping serialized to YAML text (empty when absent).
    /// Kept so downstream rules can match on constraint keywords.
    pub constraints_text: String,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct DataQualitySpec {
    pub completeness: Vec<CompletenessTarget>,
    pub freshness_max_age: String,
    pub business_rules: Vec<BusinessRule>,
    pub monitoring_metrics: Vec<MonitoringMetric>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct CompletenessTarget {
    pub column: String,
    pub percent: f64,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct BusinessRule {
    pub rule_id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct MonitoringMetric {
    pub name: String,
    pub threshold: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MaskingPolicy {
    pub name: String,
    pub data_type: String,
    pub applies_to: String,
    pub description: String,
    /// Free text. Echoed into the generated policy comment, never interpreted.
    pub behavior: String,
    pub authorized_roles: Vec<String>,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: "STRING".to_string(),
            applies_to: String::new(),
            description: String::new(),
            behavior: String::new(),
            authorized_roles: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct AccessControl {
    pub authorized_roles: Vec<String>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct Sla {
    pub data_freshness: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_fully_populated() {
        let model = ContractModel::default();
        assert_eq!(model.target.materialization, "table");
        assert!(model.primary_key.is_empty());
        assert!(model.masking_policies.is_empty());
        assert_eq!(model.qualified_target(), "..");
    }

    #[test]
    fn test_masking_policy_default_data_type() {
        let policy = MaskingPolicy::default();
        assert_eq!(policy.data_type, "STRING");
        assert!(policy.authorized_roles.is_empty());
    }
}
