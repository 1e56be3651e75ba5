//! Shop CLI - store checks and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Validate and print the record kind to collection table
//! shop-cli collections
//!
//! # Check that the configured MongoDB database answers
//! shop-cli ping
//!
//! # Insert products from a YAML list
//! shop-cli seed products fixtures/products.yaml
//! ```
//!
//! Store commands read `DATABASE_URL` and `DATABASE_NAME` the same way the
//! API server does, including a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shop API operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and print the collection table
    Collections,
    /// Connect to the store and list its collections
    Ping,
    /// Seed the store from YAML files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert products from a YAML list of product payloads
    Products {
        /// Path to the YAML file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Collections => commands::inspect::collections()?,
        Commands::Ping => commands::inspect::ping().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
    }
    Ok(())
}
