//! Status command implementation
//!
//! Dry run of change detection: reports which bundles a build would
//! repackage without writing anything.

use std::path::PathBuf;

use console::Style;

use crate::builder::discover_bundles;
use crate::cli::StatusArgs;
use crate::commands::helpers::Project;
use crate::detect::{self, AssetFile};
use crate::error::Result;

/// Change state of one bundle directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStatus {
    /// Would be repackaged
    Dirty,
    /// Built and unchanged since
    Clean,
    /// No qualifying assets; never packaged
    Empty,
}

/// Classify a bundle directory
pub fn bundle_status(
    info: Option<&crate::config::BundleInfo>,
    assets: &[AssetFile],
    force: bool,
) -> BundleStatus {
    if assets.is_empty() {
        BundleStatus::Empty
    } else if detect::needs_rebuild(info, assets, force) {
        BundleStatus::Dirty
    } else {
        BundleStatus::Clean
    }
}

/// Run status command
pub fn run(config: Option<PathBuf>, args: StatusArgs) -> Result<()> {
    let project = Project::load(config)?;
    let layout = project.layout(args.platform);
    let settings = &project.config.settings;

    let mut dirty = 0;
    for group in &project.config.groups {
        println!("{}", Style::new().bold().yellow().apply_to(&group.name));
        let sources = discover_bundles(group, settings, &layout)?;
        if sources.is_empty() {
            println!("  {}", Style::new().dim().apply_to("no bundle directories"));
        }

        for source in sources {
            let assets = detect::collect_assets(&source.dir, settings)?;
            let info = project.config.bundle_info(&source.name);
            let label = match bundle_status(info, &assets, args.force) {
                BundleStatus::Dirty => {
                    dirty += 1;
                    let changed = detect::changed_assets(info, &assets).len();
                    Style::new()
                        .red()
                        .apply_to(format!("dirty ({changed}/{} assets changed)", assets.len()))
                }
                BundleStatus::Clean => Style::new().green().apply_to("clean".to_string()),
                BundleStatus::Empty => Style::new().dim().apply_to("empty".to_string()),
            };
            println!("  {} {label}", source.name);
        }
    }

    println!();
    println!(
        "{} bundle(s) would be rebuilt for {}",
        Style::new().bold().apply_to(dirty),
        args.platform
    );
    Ok(())
}
