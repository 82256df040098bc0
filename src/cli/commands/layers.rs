//! Layers command - list layer descriptors

use crate::cli::args::{LayersArgs, OutputFormat};
use crate::config::Config;
use crate::error::KitResult;
use crate::layers::{LayerFlags, Layers};
use crate::logger::Logger;
use console::style;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct LayerRow {
    name: String,
    #[serde(flatten)]
    flags: LayerFlags,
    metadata_keys: usize,
    has_content: bool,
}

/// Execute the layers command
pub fn execute(args: LayersArgs, _config: &Config) -> KitResult<()> {
    let layers = Layers::new(&args.root, &args.root, Logger::default());

    let mut rows = Vec::new();
    for layer in layers.existing()? {
        let descriptor = layer.read_descriptor()?.unwrap_or_default();
        rows.push(LayerRow {
            name: layer.name().to_string(),
            flags: descriptor.flags,
            metadata_keys: descriptor.metadata.len(),
            has_content: layer.root().is_dir(),
        });
    }

    match args.format {
        OutputFormat::Table => print_table(&rows),
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Plain => print_plain(&rows),
    }

    Ok(())
}

fn print_table(rows: &[LayerRow]) {
    if rows.is_empty() {
        println!("No layers found.");
        return;
    }

    println!(
        "{:<40} {:<7} {:<7} {:<7} {:<9}",
        style("NAME").bold(),
        style("BUILD").bold(),
        style("CACHE").bold(),
        style("LAUNCH").bold(),
        style("METADATA").bold()
    );
    println!("{}", "-".repeat(74));

    for row in rows {
        let name = if row.has_content {
            style(row.name.as_str()).cyan()
        } else {
            style(row.name.as_str()).dim()
        };
        println!(
            "{:<40} {:<7} {:<7} {:<7} {:<9}",
            name,
            yes_no(row.flags.build),
            yes_no(row.flags.cache),
            yes_no(row.flags.launch),
            row.metadata_keys
        );
    }

    println!();
    println!("{} layer(s)", rows.len());
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "-"
    }
}

fn print_json(rows: &[LayerRow]) -> KitResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    println!("{}", json);
    Ok(())
}

fn print_plain(rows: &[LayerRow]) {
    for row in rows {
        println!("{}", row.name);
    }
}
