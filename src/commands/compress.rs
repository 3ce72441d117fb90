//! Compress command implementation
//!
//! Bulk-compresses a directory into the version root of a platform, the
//! standalone counterpart of the per-bundle compression done by `build`.

use std::path::PathBuf;

use console::Style;

use crate::cli::CompressArgs;
use crate::commands::helpers::Project;
use crate::compress::compress_dir;
use crate::error::{Result, file_not_found};

/// Run compress command
pub fn run(config: Option<PathBuf>, args: CompressArgs) -> Result<()> {
    let project = Project::load(config)?;
    if !args.dir.is_dir() {
        return Err(file_not_found(args.dir.display().to_string()));
    }
    let layout = project.layout(args.platform);

    let report = compress_dir(&args.dir, &layout.version_root, &project.config.settings)?;

    println!(
        "{} {} file(s) into {}",
        Style::new().bold().green().apply_to("Compressed"),
        report.compressed.len(),
        layout.version_root.display()
    );
    for failure in &report.failed {
        println!("  {} {failure}", Style::new().red().apply_to("failed"));
    }

    match report.failed.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
