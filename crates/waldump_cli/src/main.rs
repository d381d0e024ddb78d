//! waldump CLI
//!
//! Prints the contents of a Raft write-ahead log directory.
//!
//! # Commands
//!
//! - `dump` - Decode every entry and print it as one JSON object per line
//! - `inspect` - List the segment files and what they hold
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use waldump_core::DumpConfig;

/// Raft write-ahead log dump tool.
#[derive(Parser)]
#[command(name = "waldump")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump log entries as JSON lines
    Dump {
        /// Path to the WAL directory
        dir: PathBuf,

        /// Exclusive lower bound on the entry index
        #[arg(long, default_value = "0")]
        after: u64,

        /// Exclusive upper bound on the entry index
        #[arg(long, default_value = "0")]
        before: u64,

        /// Keep running and print new entries as they are appended
        #[arg(short, long)]
        tail: bool,

        /// Show common commands in a short form, e.g. KV writes as key and size
        #[arg(long)]
        short: bool,

        /// Delay between polls in tail mode, in milliseconds
        #[arg(long, default_value = "1000")]
        poll_interval_ms: u64,
    },

    /// List segment files
    Inspect {
        /// Path to the WAL directory
        dir: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only dump output.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Dump {
            dir,
            after,
            before,
            tail,
            short,
            poll_interval_ms,
        } => {
            let config = DumpConfig::default()
                .after(after)
                .before(before)
                .follow(tail)
                .short(short)
                .poll_interval(Duration::from_millis(poll_interval_ms));
            commands::dump::run(&dir, &config)?;
        }
        Commands::Inspect { dir, format } => {
            commands::inspect::run(&dir, &format)?;
        }
        Commands::Version => {
            println!("waldump CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("waldump core v{}", waldump_core::VERSION);
        }
    }

    Ok(())
}
