//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// cnbkit - buildpack layer inspection
///
/// Inspects layer descriptors, prunes stale ones and previews process
/// type output the way a build would log it.
#[derive(Parser, Debug)]
#[command(name = "cnbkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CNBKIT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List layer descriptors under a layers root
    Layers(LayersArgs),

    /// Remove descriptors of layers not kept
    Cleanup(CleanupArgs),

    /// Print the process types declared in a launch.toml
    Processes(ProcessesArgs),

    /// Print the synthetic cache-layer hash for dependency ids
    Hash(HashArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the layers command
#[derive(Parser, Debug)]
pub struct LayersArgs {
    /// Layers root directory
    pub root: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the cleanup command
#[derive(Parser, Debug)]
pub struct CleanupArgs {
    /// Layers root directory
    pub root: PathBuf,

    /// Layer names to keep (may be repeated)
    #[arg(short, long = "keep", value_name = "NAME")]
    pub keep: Vec<String>,

    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the processes command
#[derive(Parser, Debug)]
pub struct ProcessesArgs {
    /// Path to a launch.toml
    pub file: PathBuf,
}

/// Arguments for the hash command
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Dependency ids
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

/// Output format for listings
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_cleanup_keeps() {
        let cli = Cli::parse_from(["cnbkit", "cleanup", "/layers", "-k", "a", "--keep", "b"]);
        match cli.command {
            Commands::Cleanup(args) => {
                assert_eq!(args.root, PathBuf::from("/layers"));
                assert_eq!(args.keep, vec!["a", "b"]);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["cnbkit", "-vv", "hash", "x"]);
        assert_eq!(cli.verbose, 2);
    }
}
