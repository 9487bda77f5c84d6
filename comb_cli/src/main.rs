//! # comb_cli - Load Combination Generator CLI
//!
//! Usage:
//!   comb_cli                                   # Built-in footbridge catalogue
//!   comb_cli catalog.json                      # Catalogue document
//!   comb_cli catalog.json -l SLS-QP            # One limit state
//!   comb_cli catalog.json --format json        # JSON output
//!   comb_cli catalog.json -o snapshot.json     # Export the snapshot
//!   comb_cli catalog.json -r reference.json    # Compare with reference matrices
//!
//! Set `RUST_LOG=debug` for pipeline details.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use comb_core::combinations::{CombinationGenerator, CombinationSet, PermanentEnvelope};
use comb_core::document::{footbridge_example, CatalogDocument};
use comb_core::errors::CombResult;
use comb_core::file_io::{load_document, save_document, save_snapshot};
use comb_core::verification::ReferenceFixture;
use comb_core::LimitState;

#[derive(Parser)]
#[command(name = "comb_cli")]
#[command(about = "Generate load combinations from an action catalogue")]
struct Args {
    /// Catalogue document (JSON). Uses the footbridge demo catalogue if omitted
    catalog: Option<PathBuf>,

    /// Only print one limit state (ULS-P, ULS-E, SLS-C, SLS-F, SLS-QP)
    #[arg(short = 'l', long)]
    limit_state: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,

    /// Permanent action envelope (power-set, extremes); overrides the document
    #[arg(short = 'e', long)]
    envelope: Option<PermanentEnvelope>,

    /// Write the computed snapshot to this file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Reference fixture to compare against
    #[arg(short = 'r', long)]
    reference: Option<PathBuf>,

    /// Largest RMS difference accepted by --reference
    #[arg(long, default_value = "1e-6")]
    tolerance: f64,

    /// Save the demo catalogue to this file and exit
    #[arg(long)]
    write_example: Option<PathBuf>,
}

fn parse_limit_state(code: &str) -> Option<LimitState> {
    LimitState::ALL
        .iter()
        .copied()
        .find(|ls| ls.code().eq_ignore_ascii_case(code))
}

fn load_catalog(args: &Args) -> CombResult<CatalogDocument> {
    let mut document = match &args.catalog {
        Some(path) => load_document(path)?,
        None => {
            log::info!("no catalogue given, using the footbridge demo");
            footbridge_example()
        }
    };
    if let Some(envelope) = args.envelope {
        document.settings.permanent_envelope = envelope;
    }
    Ok(document)
}

fn print_set(set: &CombinationSet) {
    println!("═══════════════════════════════════════");
    println!(
        "  {} - {} ({} combinations)",
        set.limit_state().code(),
        set.limit_state().display_name(),
        set.len()
    );
    println!("═══════════════════════════════════════");
    if set.is_empty() {
        println!("  (no applicable combinations)");
    }
    for (i, combination) in set.iter().enumerate() {
        println!("  {:>3}  {}", i + 1, combination);
    }
    println!();
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.write_example {
        return match save_document(&footbridge_example(), path) {
            Ok(()) => {
                println!("Wrote demo catalogue to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error writing demo catalogue: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let selected = match args.limit_state.as_deref().map(parse_limit_state) {
        None => None,
        Some(Some(ls)) => Some(ls),
        Some(None) => {
            eprintln!("Unknown limit state '{}'", args.limit_state.as_deref().unwrap_or_default());
            return ExitCode::FAILURE;
        }
    };

    let document = match load_catalog(&args) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading catalogue: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut generator: CombinationGenerator = match document.build_generator() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Invalid catalogue: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let snapshot = generator.compute_combinations().clone();

    let sets: Vec<&CombinationSet> = snapshot
        .sets
        .iter()
        .filter(|set| selected.map_or(true, |ls| set.limit_state() == ls))
        .collect();

    match args.format.as_str() {
        "json" => match serde_json::to_string_pretty(&sets) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing combinations: {}", e);
                return ExitCode::FAILURE;
            }
        },
        "text" => {
            println!(
                "{} combinations for {} actions ({})",
                snapshot.settings.code,
                generator.catalog().len(),
                document.meta.job_id
            );
            println!();
            for set in &sets {
                print_set(set);
            }
            for diagnostic in &snapshot.diagnostics {
                println!("warning: {}", diagnostic);
            }
        }
        other => {
            eprintln!("Unknown format '{}' (expected text or json)", other);
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = &args.output {
        if let Err(e) = save_snapshot(&snapshot, path) {
            eprintln!("Error writing snapshot: {}", e);
            return ExitCode::FAILURE;
        }
        log::info!("snapshot written to {}", path.display());
    }

    if let Some(path) = &args.reference {
        let results = ReferenceFixture::load(path).and_then(|fixture| fixture.compare(&generator));
        let results = match results {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error comparing with reference: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let mut passed = true;
        for (limit_state, rms) in results {
            let ok = rms <= args.tolerance;
            passed &= ok;
            eprintln!("{:<7} rms {:.3e} {}", limit_state.code(), rms, if ok { "ok" } else { "FAIL" });
        }
        if !passed {
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
