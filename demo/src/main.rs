//! Caretrace Care-Operations Reference Runtime — Demo CLI
//!
//! Runs one or all of the four compliance demo scenarios.  Each scenario uses
//! real Caretrace components (logic evaluator, session engine, finding
//! synthesizer, provenance guard, audit ledger, migration planner) wired
//! together with mock care-provider data.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- full-inspection
//!   cargo run -p demo -- tamper-audit
//!   cargo run -p demo -- contamination-guard
//!   cargo run -p demo -- regulation-migration

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use caretrace_contracts::error::CoreResult;
use caretrace_ref_careops::scenarios::{
    contamination_guard, full_inspection, regulation_migration, tamper_audit,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Caretrace — deterministic compliance reasoning demo.
///
/// Each subcommand runs one or all of the four care-operations scenarios,
/// demonstrating bounded sessions, provenance enforcement, and tamper-evident
/// auditing.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Caretrace care-operations reference runtime demo",
    long_about = "Runs Caretrace compliance demo scenarios showing deterministic\n\
                  evaluation, bounded mock inspections, provenance guarantees,\n\
                  audit chain integrity, and regulation migration."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four care-operations scenarios in sequence.
    RunAll,
    /// Scenario 1: Full Mock Inspection (snapshot → session → findings).
    FullInspection,
    /// Scenario 2: Audit Tamper Forensics (payload vs. linkage breaks).
    TamperAudit,
    /// Scenario 3: Contamination Guard (simulation never reaches the record).
    ContaminationGuard,
    /// Scenario 4: Regulation Migration (non-destructive link migration).
    RegulationMigration,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::FullInspection => full_inspection::run_scenario(),
        Command::TamperAudit => tamper_audit::run_scenario(),
        Command::ContaminationGuard => contamination_guard::run_scenario(),
        Command::RegulationMigration => regulation_migration::run_scenario(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> CoreResult<()> {
    full_inspection::run_scenario()?;
    tamper_audit::run_scenario()?;
    contamination_guard::run_scenario()?;
    regulation_migration::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Caretrace — Deterministic Compliance Reasoning Core");
    println!("Care-Operations Reference Demo");
    println!("===================================================");
    println!();
    println!("Caretrace guarantees per run:");
    println!("  [1] Logic evaluation is a pure function of snapshot + profile content");
    println!("  [2] Sessions enforce their question and follow-up bounds, and refuse past them");
    println!("  [3] Simulated findings are origin-tagged and can never enter the regulatory record");
    println!("  [4] Every mutating step lands in a per-tenant SHA-256 hash chain");
    println!("  [5] Session event logs replay to the exact live state");
    println!();
}
