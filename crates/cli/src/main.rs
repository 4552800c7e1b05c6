// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! yardsim: run a retrofit-yard scenario and print the result as JSON.
//!
//! This binary is the external collaborator around the simulation core: it
//! loads the scenario record from a JSON file, hands it to the orchestrator,
//! and writes the report to stdout. Exit codes: 0 success, 1 failed run,
//! 2 configuration error.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use ys_core::scenario::Scenario;
use ys_yard::YardOrchestrator;

#[derive(Parser)]
#[command(name = "yardsim", about = "Railway retrofit workshop yard simulator")]
struct Cli {
    /// Path to the scenario JSON file.
    scenario: PathBuf,

    /// Stop the simulation after this many simulated minutes (default: the
    /// scenario window).
    #[arg(long)]
    until: Option<f64>,

    /// Pretty-print the report JSON.
    #[arg(long)]
    pretty: bool,

    /// Omit the event stream from the report output.
    #[arg(long)]
    no_events: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            eprintln!("yardsim: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let raw = std::fs::read_to_string(&cli.scenario)
        .with_context(|| format!("reading scenario {}", cli.scenario.display()))?;
    let scenario: Scenario =
        serde_json::from_str(&raw).context("parsing scenario JSON")?;

    let orchestrator = YardOrchestrator::new(scenario).context("building simulation")?;
    let mut report = orchestrator.run(cli.until);
    let success = report.success;

    if cli.no_events {
        report.events.clear();
    }
    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serializing report")?;
    println!("{out}");
    Ok(success)
}
