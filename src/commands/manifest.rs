//! Manifest command implementation

use std::path::PathBuf;

use console::Style;

use crate::cli::ManifestArgs;
use crate::commands::helpers::Project;
use crate::error::Result;
use crate::manifest::generate_manifest;

/// Run manifest command
pub fn run(config: Option<PathBuf>, args: ManifestArgs) -> Result<()> {
    let mut project = Project::load(config)?;
    let layout = project.layout(args.platform);

    let report = generate_manifest(&mut project.config, &project.config_path, &layout)?;

    println!(
        "{} {} ({} bundles, version {})",
        Style::new().bold().green().apply_to("Manifest written:"),
        report.manifest_path.display(),
        report.recorded.len(),
        layout.version
    );
    for name in &report.unknown {
        println!(
            "  {} {name} (no configured group)",
            Style::new().yellow().apply_to("skipped")
        );
    }

    match report.failures.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
