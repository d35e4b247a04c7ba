#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for site risk reports over a JSON dataset.
//!
//! ```text
//! site_risk_cli --data dataset.json intel <site-id>
//! site_risk_cli --data dataset.json report <assessment-id> --user <user-id> [--strict]
//! ```
//!
//! Output is pretty-printed JSON on stdout. Set `REPORT_ASSEMBLY_MODE` to
//! `strict` or `fault-tolerant` to choose how `report` handles failed
//! lookups; `--strict` overrides it.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use site_risk_intelligence::engine::RiskIntelligenceEngine;
use site_risk_report::assembler::ReportAssembler;
use site_risk_report::config::{AssemblyMode, ReportConfig};
use site_risk_store::AssessmentStore;
use site_risk_store::memory::InMemoryStore;

#[derive(Parser)]
#[command(
    name = "site_risk_cli",
    about = "Crime-informed risk intelligence and assessment reports"
)]
struct Cli {
    /// Path to the JSON dataset
    #[arg(long)]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate crime intelligence for a site
    Intel {
        /// Site ID
        site_id: String,
    },
    /// Assemble the comprehensive report for an assessment
    Report {
        /// Assessment ID
        assessment_id: String,
        /// ID of the requesting user (must own the assessment)
        #[arg(long)]
        user: String,
        /// Fail on any lookup error instead of omitting the affected section
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    log::info!("Loading dataset from {}", cli.data.display());
    let store: Arc<dyn AssessmentStore> = Arc::new(InMemoryStore::from_path(&cli.data)?);

    match cli.command {
        Commands::Intel { site_id } => {
            let engine = RiskIntelligenceEngine::from_store(store).await?;

            if let Some(report) = engine.generate_report(&site_id).await? {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                eprintln!("Site not found: {site_id}");
                std::process::exit(1);
            }
        }
        Commands::Report {
            assessment_id,
            user,
            strict,
        } => {
            let mut config = ReportConfig::from_env();
            if strict {
                config = config.with_mode(AssemblyMode::Strict);
            }

            let assembler = ReportAssembler::from_store(store, config).await?;
            let report = assembler.assemble(&assessment_id, &user).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
