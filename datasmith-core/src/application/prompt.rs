// datasmith-core/src/application/prompt.rs

use std::fmt::Write as _;

use crate::domain::contract::ContractModel;

// --- PROMPT BUILDER SERVICE ---

/// Assembles the instruction document handed to the completion collaborator.
/// The transformation SQL itself is produced externally; this component only
/// describes the contract precisely enough for the model to write it.
pub struct TransformationPromptBuilder;

impl TransformationPromptBuilder {
    pub fn build(contract: &ContractModel) -> String {
        let mut columns_desc = String::new();
        for (i, col) in contract.columns.iter().enumerate() {
            if i > 0 {
                columns_desc.push('\n');
            }
            let _ = write!(
                columns_desc,
                "  - {} ({}): {}",
                col.name, col.data_type, col.description
            );
            if !col.derivation.is_empty() {
                // Free-text derivation carried verbatim for the model to implement
                let _ = write!(columns_desc, "\n    DERIVATION: {}", col.derivation);
            }
        }

        let mut source_info = String::new();
        for (i, table) in contract.source_tables.iter().enumerate() {
            if i > 0 {
                source_info.push('\n');
            }
            let key_columns = if table.key_columns.is_empty() {
                "N/A".to_string()
            } else {
                table.key_columns.join(", ")
            };
            let filter = if table.filter.is_empty() {
                "None"
            } else {
                table.filter.as_str()
            };
            let _ = write!(
                source_info,
                "  - {} ({})\n    Key columns: {}\n    Filter: {}",
                table.name, table.location, key_columns, filter
            );
        }

        format!(
            "You are an expert dbt developer generating Snowflake SQL.\n\
             Generate a production-ready dbt model based on this data contract.\n\
             \n\
             IMPORTANT: Generate ONLY valid SQL code. No explanations, just the complete dbt model.\n\
             \n\
             DATA CONTRACT:\n\
             - Name: {name}\n\
             - Title: {title}\n\
             - Grain: {grain}\n\
             - Primary Key: {primary_key}\n\
             \n\
             SOURCE TABLES:\n\
             {source_tables}\n\
             \n\
             OUTPUT COLUMNS (with derivation logic):\n\
             {columns}\n\
             \n\
             REQUIREMENTS:\n\
             1. Start with dbt config block: materialized='{materialization}', unique_key='{primary_key}'\n\
             2. Use Snowflake SQL syntax\n\
             3. Use CTEs for each source table and aggregation step\n\
             4. Use dbt source() function for source tables: source('raw', 'table_name')\n\
             5. Implement ALL derivation logic exactly as specified\n\
             6. Handle NULLs with COALESCE where appropriate\n\
             7. Include comments for complex calculations\n\
             8. Output all specified columns in the final SELECT\n\
             \n\
             Generate the complete SQL now:",
            name = contract.name,
            title = contract.title,
            grain = contract.grain,
            primary_key = contract.primary_key,
            source_tables = source_info,
            columns = columns_desc,
            materialization = contract.target.materialization,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::contract::{ColumnSpec, ContractModel, SourceTable};
    use anyhow::Result;

    fn contract() -> ContractModel {
        ContractModel {
            name: "retail-customer-churn-risk".to_string(),
            title: "Retail Customer Churn Risk".to_string(),
            grain: "One row per customer".to_string(),
            primary_key: "customer_id".to_string(),
            source_tables: vec![
                SourceTable {
                    name: "CUSTOMERS".to_string(),
                    location: "DB.RAW.CUSTOMERS".to_string(),
                    key_columns: vec!["customer_id".to_string(), "name".to_string()],
                    filter: "status = 'ACTIVE'".to_string(),
                    ..SourceTable::default()
                },
                SourceTable {
                    name: "ACCOUNTS".to_string(),
                    location: "DB.RAW.ACCOUNTS".to_string(),
                    ..SourceTable::default()
                },
            ],
            columns: vec![
                ColumnSpec {
                    name: "customer_id".to_string(),
                    data_type: "string".to_string(),
                    description: "Unique customer identifier".to_string(),
                    derivation: "CUSTOMERS.customer_id".to_string(),
                    ..ColumnSpec::default()
                },
                ColumnSpec {
                    name: "segment".to_string(),
                    data_type: "string".to_string(),
                    description: "Customer segment".to_string(),
                    ..ColumnSpec::default()
                },
            ],
            ..ContractModel::default()
        }
    }

    #[test]
    fn test_prompt_carries_contract_identity() -> Result<()> {
        let prompt = TransformationPromptBuilder::build(&contract());
        assert!(prompt.contains("- Name: retail-customer-churn-risk"));
        assert!(prompt.contains("- Title: Retail Customer Churn Risk"));
        assert!(prompt.contains("- Grain: One row per customer"));
        assert!(prompt.contains("- Primary Key: customer_id"));
        Ok(())
    }

    #[test]
    fn test_source_tables_with_keys_filter_and_fallbacks() -> Result<()> {
        let prompt = TransformationPromptBuilder::build(&contract());
        assert!(prompt.contains("  - CUSTOMERS (DB.RAW.CUSTOMERS)"));
        assert!(prompt.contains("    Key columns: customer_id, name"));
        assert!(prompt.contains("    Filter: status = 'ACTIVE'"));
        // table without keys or filter falls back to the placeholders
        assert!(prompt.contains("  - ACCOUNTS (DB.RAW.ACCOUNTS)"));
        assert!(prompt.contains("    Key columns: N/A"));
        assert!(prompt.contains("    Filter: None"));
        Ok(())
    }

    #[test]
    fn test_derivation_continuation_line_only_when_present() -> Result<()> {
        let prompt = TransformationPromptBuilder::build(&contract());
        assert!(prompt.contains(
            "  - customer_id (string): Unique customer identifier\n    DERIVATION: CUSTOMERS.customer_id"
        ));
        assert!(prompt.contains("  - segment (string): Customer segment\n"));
        assert!(!prompt.contains("DERIVATION: \n"));
        Ok(())
    }

    #[test]
    fn test_requirements_reference_materialization_and_key() -> Result<()> {
        let mut c = contract();
        c.target.materialization = "incremental".to_string();
        let prompt = TransformationPromptBuilder::build(&c);
        assert!(prompt.contains(
            "1. Start with dbt config block: materialized='incremental', unique_key='customer_id'"
        ));
        assert!(prompt.contains("8. Output all specified columns in the final SELECT"));
        assert!(prompt.ends_with("Generate the complete SQL now:"));
        Ok(())
    }
}
