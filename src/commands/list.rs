//! List command implementation
//!
//! This command lists every bundle record in the store, grouped by bundle
//! group, or as JSON with `--json`.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::cli::ListArgs;
use crate::commands::helpers::{Project, format_size};
use crate::config::{BundleConfig, BundleInfo};
use crate::error::Result;

/// One row of `list --json`
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    group: &'a str,
    #[serde(flatten)]
    info: &'a BundleInfo,
}

/// Run list command
pub fn run(config: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let project = Project::load(config)?;

    if args.json {
        println!("{}", to_json(&project.config)?);
        return Ok(());
    }

    list_bundles(&project.config);
    Ok(())
}

fn to_json(config: &BundleConfig) -> Result<String> {
    let entries: Vec<ListEntry<'_>> = config
        .all_bundles()
        .map(|(group, info)| ListEntry {
            group: &group.name,
            info,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn list_bundles(config: &BundleConfig) {
    let total = config.all_bundles().count();
    if total == 0 {
        println!("No bundles built yet.");
        return;
    }

    println!(
        "Bundles ({total}), version {}:",
        Style::new().bold().apply_to(&config.version)
    );
    println!();

    let label = Style::new().bold();
    for group in config.groups.iter().filter(|g| !g.bundles.is_empty()) {
        println!("{}", Style::new().bold().cyan().apply_to(&group.name));
        for info in &group.bundles {
            println!("  {}", Style::new().bold().yellow().apply_to(&info.name));
            println!("    {} {}", label.apply_to("Version:"), info.version);
            println!("    {} {}", label.apply_to("Size:"), format_size(info.size));
            if let Some(built) = info.build_time {
                println!(
                    "    {} {}",
                    label.apply_to("Built:"),
                    built.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
            if let Some(checksum) = &info.checksum {
                println!("    {} {checksum}", label.apply_to("Checksum:"));
            }
        }
        println!();
    }
}
