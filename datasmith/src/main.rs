// datasmith/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug datasmith generate ... for the details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: GENERATE ARTIFACTS ---
        Commands::Generate {
            contract,
            out_dir,
            model,
            emit_prompt,
        } => {
            if let Err(e) = commands::generate::execute(contract, out_dir, model, emit_prompt).await
            {
                eprintln!("❌ Generate failed: {}", e);
                std::process::exit(1);
            }
        }

        // --- USE CASE: INSPECT CONTRACT ---
        Commands::Inspect { contract } => {
            if let Err(e) = commands::inspect::execute(contract) {
                eprintln!("❌ Inspect failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
