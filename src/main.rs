//! cnbkit - buildpack layer inspection
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use cnbkit::cli::{commands, Cli, Commands};
use cnbkit::config::ConfigManager;
use cnbkit::error::KitResult;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> KitResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("cnbkit=warn"),
        1 => EnvFilter::new("cnbkit=info"),
        _ => EnvFilter::new("cnbkit=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load()?;

    match cli.command {
        Commands::Layers(args) => commands::layers(args, &config),
        Commands::Cleanup(args) => commands::cleanup(args, &config),
        Commands::Processes(args) => commands::processes(args, &config),
        Commands::Hash(args) => commands::hash(args, &config),
        Commands::Config(args) => commands::config(args, &config, &manager),
    }
}
