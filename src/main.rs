mod commands;
mod config;
mod discovery;
mod document;
mod engine;
mod error;
mod patch;
mod report;
mod rules;
mod styles;
mod types;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::types::Severity;

#[derive(Parser)]
#[command(
    name = "skylint",
    version,
    about = "Compatibility linter for mini-programs migrating to the skyline renderer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the project and report incompatibilities
    Check {
        /// Project root containing app.json
        #[arg(long, default_value = ".")]
        path: PathBuf,
        /// Pages to analyze; defaults to the pages opting into skyline
        #[arg(long, value_delimiter = ',')]
        pages: Vec<String>,
        /// Minimum severity to display: 0 verbose, 1 info, 2 warn, 3 error
        #[arg(long, default_value_t = 0)]
        log_level: u8,
    },
    /// Apply every automatic fix the rules propose
    Fix {
        /// Project root containing app.json
        #[arg(long, default_value = ".")]
        path: PathBuf,
        /// Pages to analyze; defaults to the pages opting into skyline
        #[arg(long, value_delimiter = ',')]
        pages: Vec<String>,
    },
    /// List registered rules
    Rules,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { path, pages, log_level } => {
            commands::check(&path, &pages, Severity::from_level(log_level))
        },
        Commands::Fix { path, pages } => commands::fix(&path, &pages),
        Commands::Rules => {
            commands::rules_list();
            return ExitCode::SUCCESS;
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}
