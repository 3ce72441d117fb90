//! Build command implementation
//!
//! Runs the full pipeline for one platform and prints a per-group summary.

use std::path::PathBuf;

use console::Style;

use crate::cli::BuildArgs;
use crate::commands::helpers::{Project, progress_reporter};
use crate::error::{Result, cancelled};
use crate::packager::TarPackager;
use crate::pipeline::{GroupReport, Pipeline, PipelineOptions, PipelineReport, PipelineState};

/// Run build command
pub fn run(config: Option<PathBuf>, args: BuildArgs, quiet: bool) -> Result<()> {
    let mut project = Project::load(config)?;

    let mut options = PipelineOptions::new(args.platform);
    options.force = args.force;
    options.groups = args.groups;
    options.skip_manifest = args.no_manifest;

    let total_groups = if options.groups.is_empty() {
        project.config.groups.len()
    } else {
        options.groups.len()
    };
    let packager = TarPackager;
    let mut pipeline = Pipeline::new(&packager, &project.config_path)
        .with_reporter(progress_reporter(quiet, total_groups as u64));
    let report = pipeline.run(&mut project.config, &options)?;

    if !quiet {
        print_summary(&report, &options);
    }

    exit_status(report)
}

/// Map a finished run to the command result
///
/// A cancelled run and any isolated failure both make the command fail; the
/// first failure is the one surfaced.
fn exit_status(report: PipelineReport) -> Result<()> {
    if report.state == PipelineState::Aborted {
        return Err(cancelled(report.cancelled_at.unwrap_or_default()));
    }
    if report.is_success() {
        return Ok(());
    }

    match report.groups.into_iter().flat_map(|g| g.failures).next() {
        Some(e) => Err(e),
        None => match report.manifest.and_then(|m| m.failures.into_iter().next()) {
            Some(e) => Err(e),
            None => Ok(()),
        },
    }
}

fn print_summary(report: &PipelineReport, options: &PipelineOptions) {
    let bold = Style::new().bold();

    if report.state == PipelineState::Aborted {
        println!("{}", Style::new().bold().red().apply_to("Build cancelled"));
        return;
    }

    println!(
        "{} {}",
        bold.apply_to("Platform:"),
        Style::new().cyan().apply_to(options.platform)
    );
    for group in &report.groups {
        print_group(group);
    }
    println!();

    if let Some(manifest) = &report.manifest {
        println!(
            "{} {} ({} bundles)",
            bold.apply_to("Manifest:"),
            manifest.manifest_path.display(),
            manifest.recorded.len()
        );
    }
    println!(
        "{} {} packaged, {} compressed, {} unchanged in {:.2}s",
        Style::new().bold().green().apply_to("Done:"),
        report.packaged_count(),
        report.compressed_count(),
        report.skipped_count(),
        report.elapsed.as_secs_f64()
    );
}

fn print_group(group: &GroupReport) {
    let name = Style::new().bold().yellow().apply_to(&group.group);
    if !group.is_ok() {
        println!("  {name} {}", Style::new().red().apply_to("failed"));
        for failure in &group.failures {
            println!("    {failure}");
        }
        return;
    }
    if group.packaged.is_empty() {
        println!(
            "  {name} {}",
            Style::new().dim().apply_to(format!("up to date ({} bundles)", group.bundles))
        );
        return;
    }
    println!("  {name}");
    for bundle in &group.packaged {
        let marker = if group.compressed.contains(bundle) {
            Style::new().green().apply_to("compressed")
        } else {
            Style::new().dim().apply_to("unchanged")
        };
        println!("    {bundle} {marker}");
    }
}
