// datasmith-core/src/infrastructure/config/contract.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use walkdir::WalkDir;

use crate::domain::contract::{ContractModel, extract_contract};
use crate::infrastructure::error::InfrastructureError;

/// Load a contract file and extract the normalized model.
///
/// A YAML syntax error in the raw text is an infrastructure error; past that
/// point extraction is permissive and always yields a model.
#[instrument(skip_all)]
pub fn load_contract<P: AsRef<Path>>(path: P) -> Result<ContractModel, InfrastructureError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(InfrastructureError::ContractNotFound(
            path.display().to_string(),
        ));
    }

    let content = fs::read_to_string(path).map_err(InfrastructureError::Io)?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&content)?;

    let model = extract_contract(&doc);
    info!(contract = %model.name, version = %model.version, "Contract loaded");
    Ok(model)
}

/// Find contract files (`.yaml` / `.yml`) under a directory, sorted for
/// deterministic batch runs.
pub fn discover_contracts<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(dir.as_ref())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| {
            matches!(
                entry.path().extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .map(|entry| entry.into_path())
        .collect();

    found.sort();
    found
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_load_contract_extracts_model() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("contract.yaml");
        fs::write(
            &path,
            r#"
metadata:
  name: retail-customer-churn-risk
  version: "2.1.0"
spec:
  destination:
    table: "CUSTOMER_CHURN_RISK"
"#,
        )?;

        let model = load_contract(&path)?;
        assert_eq!(model.name, "retail-customer-churn-risk");
        assert_eq!(model.version, "2.1.0");
        assert_eq!(model.target.table, "CUSTOMER_CHURN_RISK");
        Ok(())
    }

    #[test]
    fn test_load_contract_missing_file() -> Result<()> {
        let result = load_contract(Path::new("/nonexistent/contract.yaml"));
        assert!(matches!(
            result,
            Err(InfrastructureError::ContractNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_contract_invalid_yaml_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "metadata: [unclosed")?;

        let result = load_contract(&path);
        assert!(matches!(result, Err(InfrastructureError::YamlError(_))));
        Ok(())
    }

    #[test]
    fn test_discover_contracts_sorted_and_filtered() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("nested"))?;
        fs::write(dir.path().join("b.yaml"), "{}")?;
        fs::write(dir.path().join("a.yml"), "{}")?;
        fs::write(dir.path().join("nested/c.yaml"), "{}")?;
        fs::write(dir.path().join("README.md"), "not a contract")?;

        let found = discover_contracts(dir.path());
        let names: Vec<String> = found
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect();

        assert_eq!(names, vec!["a.yml", "b.yaml", "nested/c.yaml"]);
        Ok(())
    }
}
