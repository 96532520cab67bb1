// datasmith/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datasmith")]
#[command(about = "The Data Contract Code Generator (dbt + Snowflake governance)", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🛠️ Generates the four artifacts from a contract (or a directory of contracts)
    Generate {
        /// Contract YAML file, or a directory scanned for contracts
        #[arg(long, short)]
        contract: PathBuf,

        /// Output directory for the generated artifacts
        #[arg(long, default_value = "target/generated")]
        out_dir: PathBuf,

        /// Completion model identifier recorded for the transformation step
        #[arg(long, default_value = "claude-3-5-sonnet")]
        model: String,

        /// Also write the transformation prompt next to the artifacts
        #[arg(long, default_value = "false")]
        emit_prompt: bool,
    },

    /// 🔍 Inspects a contract (identity, target, sources, columns)
    Inspect {
        /// Contract YAML file
        #[arg(long, short)]
        contract: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_generate_defaults() -> Result<()> {
        let args = Cli::parse_from(["datasmith", "generate", "--contract", "contract.yaml"]);
        match args.command {
            Commands::Generate {
                contract,
                out_dir,
                model,
                emit_prompt,
            } => {
                assert_eq!(contract.to_string_lossy(), "contract.yaml");
                assert_eq!(out_dir.to_string_lossy(), "target/generated");
                assert_eq!(model, "claude-3-5-sonnet");
                assert!(!emit_prompt);
                Ok(())
            }
            _ => bail!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_generate_overrides() -> Result<()> {
        let args = Cli::parse_from([
            "datasmith",
            "generate",
            "--contract",
            "contracts/",
            "--out-dir",
            "/tmp/out",
            "--model",
            "mixtral-8x7b",
            "--emit-prompt",
        ]);
        match args.command {
            Commands::Generate {
                contract,
                out_dir,
                model,
                emit_prompt,
            } => {
                assert_eq!(contract.to_string_lossy(), "contracts/");
                assert_eq!(out_dir.to_string_lossy(), "/tmp/out");
                assert_eq!(model, "mixtral-8x7b");
                assert!(emit_prompt);
                Ok(())
            }
            _ => bail!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect() -> Result<()> {
        let args = Cli::parse_from(["datasmith", "inspect", "-c", "contract.yaml"]);
        match args.command {
            Commands::Inspect { contract } => {
                assert_eq!(contract.to_string_lossy(), "contract.yaml");
                Ok(())
            }
            _ => bail!("Expected Inspect command"),
        }
    }
}
