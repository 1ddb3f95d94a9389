//! Simile - adaptive drill engine for visual-discrimination exercises
//!
//! CLI entry point.

use std::io::{self, BufReader};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use simile::cli::report::ReportOptions;
use simile::config::Config;
use simile::corpus::UnitType;
use simile::storage::FileLedgerStore;
use simile::{DrillCommand, DrillOptions, PoolsCommand, ReportCommand, ResetCommand};

/// Simile - adaptive drill for visually confusable letters, syllables, and words
#[derive(Parser)]
#[command(name = "simile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive drill session
    Drill {
        /// Unit type to drill (letter, syllable, word)
        #[arg(long, short)]
        unit: Option<UnitType>,
        /// Number of choices per turn (2-8)
        #[arg(long, short)]
        proposals: Option<usize>,
        /// Fluency threshold in milliseconds (3000, 6000, 9000)
        #[arg(long)]
        fluency_ms: Option<u64>,
        /// Start in focus mode
        #[arg(long)]
        focus: bool,
        /// Start with focus mode off, overriding config and environment
        #[arg(long, conflicts_with = "focus")]
        no_focus: bool,
        /// Path to a custom set JSON file
        #[arg(long)]
        custom_set: Option<String>,
        /// Name to print on an earned certificate
        #[arg(long)]
        name: Option<String>,
    },

    /// Show ledger totals and the most-failed items
    Report {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Unit type whose pool resolves item display values
        #[arg(long, short)]
        unit: Option<UnitType>,
    },

    /// List the built-in pools
    Pools {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Clear the persisted performance ledger
    ResetLedger,
}

/// Resolve the focus flag pair against the configured value: either flag
/// wins over config and environment, no flag keeps the configured value.
fn resolve_focus(configured: bool, focus: bool, no_focus: bool) -> bool {
    if focus {
        true
    } else if no_focus {
        false
    } else {
        configured
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("simile error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Drill {
            unit,
            proposals,
            fluency_ms,
            focus,
            no_focus,
            custom_set,
            name,
        } => {
            let mut config = Config::load();
            if let Some(unit) = unit {
                config.unit = unit;
            }
            if let Some(proposals) = proposals {
                config.proposal_count = proposals;
            }
            if let Some(fluency_ms) = fluency_ms {
                config.fluency_threshold_ms = fluency_ms;
            }
            config.focus_mode = resolve_focus(config.focus_mode, focus, no_focus);
            if custom_set.is_some() {
                config.custom_set = custom_set;
            }
            let config = config.clamped();

            let store = FileLedgerStore::new()?;
            let stdin = io::stdin();
            let command = DrillCommand::new(config, store);
            command.run(
                &DrillOptions { learner_name: name },
                BufReader::new(stdin.lock()),
                io::stdout(),
            )?;
        }

        Commands::Report { json, unit } => {
            let mut config = Config::load();
            if let Some(unit) = unit {
                config.unit = unit;
            }
            let store = FileLedgerStore::new()?;
            let command = ReportCommand::new(config, store);
            let output = command.run()?;
            print!("{}", command.render(&output, &ReportOptions { json })?);
        }

        Commands::Pools { json } => {
            let output = PoolsCommand.run()?;
            print!("{}", PoolsCommand.render(&output, json)?);
        }

        Commands::ResetLedger => {
            let store = FileLedgerStore::new()?;
            let had_data = ResetCommand::new(store).run()?;
            if had_data {
                println!("ledger cleared");
            } else {
                println!("ledger was already empty");
            }
        }
    }

    Ok(())
}
