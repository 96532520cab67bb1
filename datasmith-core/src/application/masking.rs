// datasmith-core/src/application/masking.rs

use minijinja::Environment;

use crate::domain::contract::{ContractModel, MaskingPolicy};
use crate::error::DatasmithError;

const BANNER: &str =
    "-- ============================================================================";

/// The fixed policy body: authorized roles see the value, everyone else sees
/// the first character followed by four asterisks. The declared data type is
/// carried through the signature untouched.
const POLICY_TEMPLATE: &str = r#"CREATE OR REPLACE MASKING POLICY {{ policy }}
AS (val {{ data_type }})
RETURNS {{ data_type }} ->
    CASE
        -- Authorized roles can see full value
        WHEN CURRENT_ROLE() IN ({{ roles }}) THEN val
        -- All other roles see masked value
        ELSE CONCAT(LEFT(val, 1), '****')
    END;

COMMENT ON MASKING POLICY {{ policy }} IS
'{{ description }}. Contract: {{ contract }} v{{ version }}';"#;

// --- GENERATOR SERVICE ---

pub struct MaskingPolicyGenerator;

impl MaskingPolicyGenerator {
    /// Emit the masking-policy script for a contract.
    ///
    /// `generated_at` is the only non-derived input; the caller pins it so
    /// repeated generations stay byte-identical.
    pub fn generate(contract: &ContractModel, generated_at: &str) -> Result<String, DatasmithError> {
        if contract.masking_policies.is_empty() {
            return Ok("-- No masking policies defined in contract".to_string());
        }

        let env = Environment::new();

        let mut parts: Vec<String> = vec![
            BANNER.to_string(),
            "-- MASKING POLICIES: Generated from Data Contract".to_string(),
            BANNER.to_string(),
            format!("-- Contract: {} v{}", contract.name, contract.version),
            format!("-- Generated: {}", generated_at),
            BANNER.to_string(),
            String::new(),
            "USE ROLE ACCOUNTADMIN;".to_string(),
            format!("USE DATABASE {};", contract.target.database),
            format!("USE SCHEMA {};", contract.target.schema),
            String::new(),
        ];

        for policy in &contract.masking_policies {
            let roles_sql = resolve_roles(contract, policy)
                .iter()
                .map(|role| format!("'{}'", role.to_uppercase()))
                .collect::<Vec<_>>()
                .join(", ");

            parts.push(BANNER.to_string());
            parts.push(format!("-- MASKING POLICY: {}", policy.name));
            parts.push(BANNER.to_string());
            parts.push(format!("-- Applies to: {}", policy.applies_to));
            parts.push(format!("-- Description: {}", policy.description));
            if !policy.behavior.is_empty() {
                // Free text from the contract; echoed only, never interpreted.
                parts.push(format!("-- Behavior: {}", policy.behavior));
            }
            parts.push(BANNER.to_string());
            parts.push(String::new());

            let statement = env.render_str(
                POLICY_TEMPLATE,
                serde_json::json!({
                    "policy": policy.name.to_lowercase(),
                    "data_type": policy.data_type,
                    "roles": roles_sql,
                    "description": policy.description,
                    "contract": contract.name,
                    "version": contract.version,
                }),
            )?;
            parts.push(statement);
            parts.push(String::new());

            if !policy.applies_to.is_empty() {
                parts.push("-- Apply masking policy to column".to_string());
                parts.push(format!(
                    "ALTER TABLE IF EXISTS {}",
                    contract.qualified_target()
                ));
                parts.push(format!("    MODIFY COLUMN {}", policy.applies_to));
                parts.push(format!("    SET MASKING POLICY {};", policy.name.to_lowercase()));
                parts.push(String::new());
            }
        }

        Ok(parts.join("\n"))
    }
}

/// Role resolution precedence: the policy's own roles when non-empty, else
/// the contract-level access-control roles, else nobody (mask for everyone).
fn resolve_roles<'a>(contract: &'a ContractModel, policy: &'a MaskingPolicy) -> &'a [String] {
    if !policy.authorized_roles.is_empty() {
        &policy.authorized_roles
    } else {
        &contract.access_control.authorized_roles
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::contract::{AccessControl, TargetRef};
    use anyhow::Result;

    const STAMP: &str = "2024-06-01T00:00:00+00:00";

    fn contract_with_policy(policy: MaskingPolicy) -> ContractModel {
        ContractModel {
            name: "retail-customer-churn-risk".to_string(),
            version: "1.0.0".to_string(),
            target: TargetRef {
                database: "ANALYTICS_DB".to_string(),
                schema: "DATA_PRODUCTS".to_string(),
                table: "CUSTOMER_CHURN_RISK".to_string(),
                materialization: "table".to_string(),
            },
            masking_policies: vec![policy],
            ..ContractModel::default()
        }
    }

    #[test]
    fn test_no_policies_yields_single_comment() -> Result<()> {
        let contract = ContractModel::default();
        let script = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        assert_eq!(script, "-- No masking policies defined in contract");
        Ok(())
    }

    #[test]
    fn test_policy_statement_shape() -> Result<()> {
        let contract = contract_with_policy(MaskingPolicy {
            name: "NAME_MASK".to_string(),
            applies_to: "customer_name".to_string(),
            description: "Mask customer names".to_string(),
            behavior: "Show first initial + asterisks".to_string(),
            authorized_roles: vec!["analyst".to_string(), "manager".to_string()],
            ..MaskingPolicy::default()
        });

        let script = MaskingPolicyGenerator::generate(&contract, STAMP)?;

        assert!(script.contains("CREATE OR REPLACE MASKING POLICY name_mask"));
        assert!(script.contains("AS (val STRING)"));
        assert!(script.contains("RETURNS STRING ->"));
        assert!(script.contains("WHEN CURRENT_ROLE() IN ('ANALYST', 'MANAGER') THEN val"));
        assert!(script.contains("ELSE CONCAT(LEFT(val, 1), '****')"));
        assert!(script.contains(
            "'Mask customer names. Contract: retail-customer-churn-risk v1.0.0';"
        ));
        assert!(script.contains("-- Behavior: Show first initial + asterisks"));
        assert!(script.contains("-- Generated: 2024-06-01T00:00:00+00:00"));
        assert!(script.contains("USE DATABASE ANALYTICS_DB;"));
        assert!(script.contains("USE SCHEMA DATA_PRODUCTS;"));
        Ok(())
    }

    #[test]
    fn test_applies_to_emits_attachment_statement() -> Result<()> {
        let contract = contract_with_policy(MaskingPolicy {
            name: "NAME_MASK".to_string(),
            applies_to: "customer_name".to_string(),
            ..MaskingPolicy::default()
        });

        let script = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        assert!(script.contains(
            "ALTER TABLE IF EXISTS ANALYTICS_DB.DATA_PRODUCTS.CUSTOMER_CHURN_RISK"
        ));
        assert!(script.contains("    MODIFY COLUMN customer_name"));
        assert!(script.contains("    SET MASKING POLICY name_mask;"));
        Ok(())
    }

    #[test]
    fn test_no_applies_to_skips_attachment() -> Result<()> {
        let contract = contract_with_policy(MaskingPolicy {
            name: "ORPHAN_MASK".to_string(),
            ..MaskingPolicy::default()
        });

        let script = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        assert!(!script.contains("ALTER TABLE IF EXISTS"));
        Ok(())
    }

    #[test]
    fn test_empty_policy_roles_fall_back_to_contract_roles() -> Result<()> {
        let mut contract = contract_with_policy(MaskingPolicy {
            name: "NAME_MASK".to_string(),
            authorized_roles: vec![],
            ..MaskingPolicy::default()
        });
        contract.access_control = AccessControl {
            authorized_roles: vec!["analyst".to_string()],
        };

        let script = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        assert!(script.contains("WHEN CURRENT_ROLE() IN ('ANALYST') THEN val"));
        Ok(())
    }

    #[test]
    fn test_no_roles_anywhere_masks_for_everyone() -> Result<()> {
        let contract = contract_with_policy(MaskingPolicy {
            name: "NAME_MASK".to_string(),
            ..MaskingPolicy::default()
        });

        let script = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        assert!(script.contains("WHEN CURRENT_ROLE() IN () THEN val"));
        Ok(())
    }

    #[test]
    fn test_idempotent_for_fixed_timestamp() -> Result<()> {
        let contract = contract_with_policy(MaskingPolicy {
            name: "NAME_MASK".to_string(),
            applies_to: "customer_name".to_string(),
            authorized_roles: vec!["analyst".to_string()],
            ..MaskingPolicy::default()
        });

        let first = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        let second = MaskingPolicyGenerator::generate(&contract, STAMP)?;
        assert_eq!(first, second);
        Ok(())
    }
}
