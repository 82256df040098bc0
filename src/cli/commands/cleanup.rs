//! Cleanup command - remove descriptors of layers not kept

use crate::cli::args::CleanupArgs;
use crate::config::Config;
use crate::error::KitResult;
use crate::layers::{validate_layer_name, TouchedLayers};
use console::style;
use tracing::debug;

/// Execute the cleanup command
pub fn execute(args: CleanupArgs, _config: &Config) -> KitResult<()> {
    let mut touched = TouchedLayers::new(&args.root);
    for name in &args.keep {
        validate_layer_name(name)?;
        touched.add(name.as_str());
    }
    debug!("Keeping {} layer(s) under {}", touched.len(), args.root.display());

    let paths = if args.dry_run {
        touched.stale()?
    } else {
        touched.cleanup()?
    };

    if paths.is_empty() {
        println!("{} No stale layer descriptors", style("[OK]").green());
        return Ok(());
    }

    let verb = if args.dry_run { "Would remove" } else { "Removed" };
    for path in &paths {
        println!("  {} {} {}", style("[-]").dim(), verb, path.display());
    }
    println!();
    println!("{} {} descriptor(s)", verb, paths.len());

    Ok(())
}
