// datasmith/src/commands/generate.rs
//
// USE CASE: Generate the four pipeline artifacts from one contract file or a
// directory of contracts.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::bail;
use chrono::Utc;
use tracing::info;

use datasmith_core::application::{
    ArtifactBundle, GenerateOptions, TransformationPromptBuilder, generate_batch,
};
use datasmith_core::domain::contract::ContractModel;
use datasmith_core::infrastructure::adapters::DisabledCompletion;
use datasmith_core::infrastructure::config::{discover_contracts, load_contract};
use datasmith_core::infrastructure::fs::atomic_write;

pub async fn execute(
    contract_path: PathBuf,
    out_dir: PathBuf,
    model: String,
    emit_prompt: bool,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    // Directory input fans out to every contract found underneath.
    let batch_mode = contract_path.is_dir();
    let paths = if batch_mode {
        discover_contracts(&contract_path)
    } else {
        vec![contract_path.clone()]
    };
    if paths.is_empty() {
        bail!("No contract files found under {:?}", contract_path);
    }

    println!("⚙️  Loading {} contract(s)...", paths.len());
    let mut contracts: Vec<ContractModel> = Vec::with_capacity(paths.len());
    for path in &paths {
        contracts.push(load_contract(path)?);
    }

    let options = GenerateOptions {
        model,
        generated_at: Utc::now(),
    };

    println!("🛠️  Generating artifacts...");
    let results = generate_batch(&contracts, &DisabledCompletion, &options).await;

    let mut errors = Vec::new();
    let mut last_model_name = String::new();
    for (name, result) in results {
        match result {
            Ok(bundle) => {
                let dir = if batch_mode {
                    out_dir.join(&name)
                } else {
                    out_dir.clone()
                };
                let prompt = contracts
                    .iter()
                    .find(|c| c.name == name)
                    .filter(|_| emit_prompt)
                    .map(|c| TransformationPromptBuilder::build(c));

                write_bundle(&dir, &bundle, prompt.as_deref())?;
                info!(contract = %name, out = %dir.display(), "Artifacts written");
                println!("    ✅ {}: 4 artifacts → {}", name, dir.display());
                last_model_name = bundle.model_name;
            }
            Err(e) => {
                eprintln!("    ❌ {}: {}", name, e);
                errors.push(name);
            }
        }
    }

    if !errors.is_empty() {
        bail!("{} contract(s) failed to generate", errors.len());
    }

    println!("✨ Done in {:.2?}.", start.elapsed());
    print_next_steps(&last_model_name);
    Ok(())
}

fn write_bundle(dir: &Path, bundle: &ArtifactBundle, prompt: Option<&str>) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;

    atomic_write(
        dir.join(format!("{}.sql", bundle.model_name)),
        &bundle.transformation,
    )?;
    atomic_write(dir.join("schema.yml"), &bundle.schema_manifest)?;
    atomic_write(dir.join("masking_policies.sql"), &bundle.masking_policies)?;
    atomic_write(dir.join("dmf_setup.sql"), &bundle.quality_rules)?;

    if let Some(prompt_text) = prompt {
        atomic_write(dir.join("transformation_prompt.txt"), prompt_text)?;
    }

    Ok(())
}

fn print_next_steps(model_name: &str) {
    println!("\n📖 Next steps:");
    println!("   1. Model SQL  → models/data_products/{}.sql", model_name);
    println!("   2. Schema     → models/data_products/schema.yml");
    println!("   3. Masking    → run masking_policies.sql in Snowflake");
    println!("   4. DMF Setup  → run dmf_setup.sql in Snowflake");
    println!("\n   dbt run --select {}", model_name);
    println!("   dbt test --select {}", model_name);
}
