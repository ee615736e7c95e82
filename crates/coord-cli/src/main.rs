//! Coordination config CLI
//!
//! Inspect, resolve and edit the coordination of a persisted view config.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::ResolveShape;
use context::ConfigFile;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let file = ConfigFile::new(cli.config);
    match cli.command {
        Some(cmd) => execute_command(&file, cmd),
        None => {
            println!("{} Coordination config CLI", "coord".green().bold());
            println!();
            println!("Run {} for available commands.", "coord --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(file: &ConfigFile, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Check { json } => commands::run_check(file, json),
        Commands::Scopes { view, json } => commands::run_scopes(file, &view, json),
        Commands::Resolve {
            view,
            types,
            by,
            secondary,
            json,
        } => {
            let shape = ResolveShape::from_flags(by, secondary);
            commands::run_resolve(file, &view, &types, &shape, json)
        }
        Commands::Set {
            view,
            coordination_type,
            value,
            by_type,
            by_scope,
            write,
        } => {
            let by = by_type.zip(by_scope);
            commands::run_set(file, &view, &coordination_type, &value, by, write)
        }
        Commands::Merge {
            view,
            fragment,
            scope_prefix,
            write,
        } => commands::run_merge(file, &view, &fragment, scope_prefix, write),
        Commands::Init { registry, write } => commands::run_init(file, &registry, write),
    }
}
