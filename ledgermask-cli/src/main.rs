//! ledgermask CLI - masked production records for integration tests

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{demo, integ, logs, run, status};

/// ledgermask - obfuscate production ledger records for integration tests
#[derive(Parser)]
#[command(name = "ledgermask", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Obfuscate production records and publish them to the integration suite
    Run {
        /// Production persister properties file
        #[arg(long)]
        prod: Option<PathBuf>,
        /// Integration persister properties file
        #[arg(long)]
        integ: Option<PathBuf>,
        /// Seed the jitter for a repeatable run
        #[arg(long)]
        seed: Option<u64>,
        /// Treat dropped accounts or register entries as fatal
        #[arg(long)]
        strict: bool,
        /// Obfuscate and verify without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a sample production dataset and properties files
    Demo {
        /// Directory to create the sample workspace in
        dir: PathBuf,
        /// Number of owners to generate
        #[arg(long, default_value = "10")]
        owners: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize the records behind a properties file
    Status {
        /// Persister properties file (defaults to the configured production file)
        #[arg(long)]
        prod: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Switch the integration properties file to obfuscated records and back
    Integ {
        #[command(subcommand)]
        command: integ::IntegCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "ledgermask starting");

    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            prod,
            integ,
            seed,
            strict,
            dry_run,
            json,
        } => run::run(run::RunArgs {
            prod,
            integ,
            seed,
            strict,
            dry_run,
            json,
        }),
        Commands::Demo { dir, owners, json } => demo::run(&dir, owners, json),
        Commands::Status { prod, json } => status::run(prod, json),
        Commands::Integ { command } => integ::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
