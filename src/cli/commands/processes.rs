//! Processes command - preview process type output

use crate::cli::args::ProcessesArgs;
use crate::config::Config;
use crate::error::KitResult;
use crate::layers::{LaunchMetadata, Layers};
use crate::logger::Logger;
use std::io;

/// Execute the processes command
pub fn execute(args: ProcessesArgs, config: &Config) -> KitResult<()> {
    let metadata = LaunchMetadata::from_file(&args.file)?;

    if metadata.processes.is_empty() {
        println!("No process types declared in {}", args.file.display());
        return Ok(());
    }

    let logger = Logger::default()
        .with_info(io::stdout())
        .with_color_setting(config.output.colors);
    let root = args
        .file
        .parent()
        .map(|parent| parent.to_path_buf())
        .unwrap_or_default();

    Layers::new(&root, &root, logger).write_metadata(&metadata)
}
