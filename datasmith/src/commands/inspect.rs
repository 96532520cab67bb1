// datasmith/src/commands/inspect.rs
//
// USE CASE: Inspect a contract before generating from it (identity, target,
// sources, column table).

use std::path::PathBuf;

use comfy_table::Table;

use datasmith_core::infrastructure::config::load_contract;

pub fn execute(contract_path: PathBuf) -> anyhow::Result<()> {
    let model = load_contract(&contract_path)?;

    println!("\n📌 Contract: {} (v{})", model.name, model.version);
    if !model.title.is_empty() {
        println!("   Title: {}", model.title);
    }
    if !model.owner.name.is_empty() || !model.owner.email.is_empty() {
        println!("   Owner: {} <{}>", model.owner.name, model.owner.email);
    }

    println!("\n🎯 Target: {} [{}]", model.qualified_target(), model.target.materialization);
    if !model.grain.is_empty() {
        println!("   Grain: {}", model.grain);
    }
    if !model.primary_key.is_empty() {
        println!("   Primary Key: {}", model.primary_key);
    }

    println!("\n📥 Source Tables ({}):", model.source_tables.len());
    for table in &model.source_tables {
        println!("   • {} ({})", table.name, table.location);
        if !table.filter.is_empty() {
            println!("     Filter: {}", table.filter);
        }
    }

    println!("\n📋 Columns ({}):", model.columns.len());
    let mut table = Table::new();
    table.set_header(vec!["Column", "Type", "Required", "PII", "Tags", "Masking"]);
    for column in &model.columns {
        table.add_row(vec![
            column.name.clone(),
            column.data_type.clone(),
            if column.required { "yes" } else { "" }.to_string(),
            if column.pii { "🔒" } else { "" }.to_string(),
            column.tags.join(", "),
            column.masking_policy.clone(),
        ]);
    }
    println!("{table}");

    if !model.masking_policies.is_empty() {
        println!("\n🔐 Masking Policies ({}):", model.masking_policies.len());
        for policy in &model.masking_policies {
            println!("   • {} → {}", policy.name, policy.applies_to);
            if !policy.description.is_empty() {
                println!("     {}", policy.description);
            }
        }
    }

    if !model.data_quality.business_rules.is_empty() {
        println!(
            "\n📏 Business Rules ({}):",
            model.data_quality.business_rules.len()
        );
        for rule in &model.data_quality.business_rules {
            println!("   • {}: {}", rule.rule_id, rule.name);
            if !rule.description.is_empty() {
                println!("     {}", rule.description);
            }
        }
    }

    Ok(())
}
