//! Build pipeline
//!
//! Drives one platform build end to end:
//!
//! ```text
//! Idle -> Detecting -> Building -> Compressing -> ManifestGenerating -> Done
//!                      (any fatal error or cancellation) -> Aborted
//! ```
//!
//! Groups are processed in configuration order. A group that fails to
//! package or compress is recorded in the report and the run moves on to
//! the next group; only store load/save failures and cancellation stop the
//! run. A bundle is stamped and its hash enters the group index only after
//! its compressed copy was published, so interrupted work is redone.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::builder::{self, BuildContext, GroupBuild};
use crate::compress::{self, CompressOutcome};
use crate::config::{BundleConfig, BundleGroup, PackSettings};
use crate::error::{PackError, Result, cancelled, group_not_found};
use crate::layout::Layout;
use crate::manifest::{self, ManifestReport};
use crate::packager::{Packager, PriorSnapshot};
use crate::platform::Platform;
use crate::ui::{ProgressReporter, SilentProgressReporter};

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Detecting,
    Building,
    Compressing,
    ManifestGenerating,
    Done,
    Aborted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Detecting => "detecting",
            PipelineState::Building => "building",
            PipelineState::Compressing => "compressing",
            PipelineState::ManifestGenerating => "generating manifest",
            PipelineState::Done => "done",
            PipelineState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Options for one run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub platform: Platform,
    /// Repackage every non-empty bundle
    pub force: bool,
    /// Only build these groups; empty means all
    pub groups: Vec<String>,
    /// Stop after compression
    pub skip_manifest: bool,
    /// Checked between bundles and between groups
    pub cancel: Arc<AtomicBool>,
}

impl PipelineOptions {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            force: false,
            groups: Vec::new(),
            skip_manifest: false,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// What happened to one group
#[derive(Debug, Default)]
pub struct GroupReport {
    pub group: String,
    /// Bundles discovered under the group root
    pub bundles: usize,
    pub packaged: Vec<String>,
    pub compressed: Vec<String>,
    /// Bundles whose compressed artifact was already current
    pub skipped: Vec<String>,
    /// Packaging failure, or per-bundle compression failures
    pub failures: Vec<PackError>,
}

impl GroupReport {
    fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Summary of a run
#[derive(Debug)]
pub struct PipelineReport {
    pub state: PipelineState,
    pub groups: Vec<GroupReport>,
    pub manifest: Option<ManifestReport>,
    /// Group that was in progress or next in line when the run was cancelled
    pub cancelled_at: Option<String>,
    pub elapsed: Duration,
}

impl PipelineReport {
    pub fn packaged_count(&self) -> usize {
        self.groups.iter().map(|g| g.packaged.len()).sum()
    }

    pub fn compressed_count(&self) -> usize {
        self.groups.iter().map(|g| g.compressed.len()).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.groups.iter().map(|g| g.skipped.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PackError> {
        self.groups
            .iter()
            .flat_map(|g| g.failures.iter())
            .chain(self.manifest.iter().flat_map(|m| m.failures.iter()))
    }

    pub fn is_success(&self) -> bool {
        self.state == PipelineState::Done && self.failures().next().is_none()
    }
}

/// Orchestrates detection, packaging, compression and manifest generation
pub struct Pipeline<'a, P: Packager> {
    packager: &'a P,
    config_path: PathBuf,
    project_root: PathBuf,
    reporter: Box<dyn ProgressReporter + 'a>,
    state: PipelineState,
}

impl<'a, P: Packager> Pipeline<'a, P> {
    /// Create a pipeline for the store at `config_path`
    ///
    /// Relative settings paths resolve against the store's directory.
    pub fn new(packager: &'a P, config_path: &Path) -> Self {
        let project_root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            packager,
            config_path: config_path.to_path_buf(),
            project_root,
            reporter: Box::new(SilentProgressReporter),
            state: PipelineState::Idle,
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter + 'a>) -> Self {
        self.reporter = reporter;
        self
    }

    #[allow(dead_code)]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, state: PipelineState) {
        debug!(from = %self.state, to = %state, "pipeline state");
        self.state = state;
    }

    /// Run the pipeline against `config`
    pub fn run(&mut self, config: &mut BundleConfig, options: &PipelineOptions) -> Result<PipelineReport> {
        let started = Instant::now();
        self.transition(PipelineState::Idle);

        for name in &options.groups {
            if config.find_group(name).is_none() {
                self.transition(PipelineState::Aborted);
                return Err(group_not_found(name));
            }
        }

        let layout = Layout::new(config, &self.project_root, options.platform);
        info!(
            platform = %options.platform,
            version = %layout.version,
            output = %layout.platform_root.display(),
            "build started"
        );

        let selected: Vec<usize> = config
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| options.groups.is_empty() || options.groups.contains(&g.name))
            .map(|(i, _)| i)
            .collect();

        let mut groups = Vec::new();
        let settings = config.settings.clone();
        for (position, &index) in selected.iter().enumerate() {
            let group = &mut config.groups[index];
            if options.is_cancelled() {
                return Ok(self.abort(groups, &group.name, started));
            }
            self.reporter
                .start_group(&group.name, position + 1, selected.len());

            match self.run_group(group, &settings, &layout, options) {
                Ok(report) => groups.push(report),
                Err(PackError::Cancelled { group }) => {
                    warn!(%group, "build cancelled");
                    return Ok(self.abort(groups, &group, started));
                }
                Err(e) => return Err(self.fail(e)),
            }
            self.reporter.finish_group();
        }

        let manifest = if options.skip_manifest {
            // build times must survive even without a manifest
            if let Err(e) = config.save(&self.config_path) {
                return Err(self.fail(e));
            }
            None
        } else {
            self.transition(PipelineState::ManifestGenerating);
            match manifest::generate_manifest(config, &self.config_path, &layout) {
                Ok(report) => Some(report),
                Err(e) => return Err(self.fail(e)),
            }
        };

        self.transition(PipelineState::Done);
        self.reporter.finish();
        let report = PipelineReport {
            state: self.state,
            groups,
            manifest,
            cancelled_at: None,
            elapsed: started.elapsed(),
        };
        info!(
            packaged = report.packaged_count(),
            compressed = report.compressed_count(),
            skipped = report.skipped_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "build finished"
        );
        Ok(report)
    }

    /// Build and compress one group
    ///
    /// Packaging and compression failures end up in the returned report.
    /// Only cancellation and fatal store errors are returned as `Err`.
    fn run_group(
        &mut self,
        group: &mut BundleGroup,
        settings: &PackSettings,
        layout: &Layout,
        options: &PipelineOptions,
    ) -> Result<GroupReport> {
        let mut report = GroupReport::new(&group.name);

        self.transition(PipelineState::Detecting);
        let prior = match PriorSnapshot::load(&layout.group_index_path(&group.name)) {
            Ok(prior) => prior,
            Err(e) => {
                warn!(group = %group.name, error = %e, "cannot read group index");
                report.failures.push(e);
                return Ok(report);
            }
        };

        self.transition(PipelineState::Building);
        let ctx = BuildContext {
            settings,
            layout,
            packager: self.packager,
            cancel: Arc::clone(&options.cancel),
        };
        let build = match builder::build_group(&ctx, group, options.force) {
            Ok(build) => build,
            Err(e @ PackError::Cancelled { .. }) => return Err(e),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(group = %group.name, error = %e, "group skipped");
                report.failures.push(e);
                return Ok(report);
            }
        };
        report.bundles = build.bundles.len();
        report.packaged = build.dirty.clone();

        if build.is_packaged() {
            self.transition(PipelineState::Compressing);
            self.compress_group(group, &build, &prior, layout, options, &mut report)?;
        }
        Ok(report)
    }

    fn compress_group(
        &mut self,
        group: &mut BundleGroup,
        build: &GroupBuild,
        prior: &PriorSnapshot,
        layout: &Layout,
        options: &PipelineOptions,
        report: &mut GroupReport,
    ) -> Result<()> {
        self.reporter
            .init_bundle_progress(build.dirty.len() as u64 + 1);

        let mut published = Vec::new();
        let mut interrupted = false;
        for name in &build.dirty {
            if options.is_cancelled() {
                interrupted = true;
                break;
            }
            let Some(new_hash) = build.manifest.bundle_hash(name) else {
                continue;
            };
            let outcome = compress_and_publish(
                name,
                &layout.artifact_path(name),
                prior.hash_of(name),
                new_hash,
                layout,
            );
            if record(report, name, outcome) {
                published.push(name.clone());
            }
            self.reporter.bundle_done(name);
        }

        let index_hash = match builder::record_group(layout, group, build, &published, prior) {
            Ok(index_hash) => index_hash,
            Err(e) => {
                warn!(group = %build.group, error = %e, "group index not written");
                report.failures.push(e);
                None
            }
        };
        if interrupted {
            return Err(cancelled(&build.group));
        }

        // the group index travels with its bundles
        if let Some(index_hash) = index_hash {
            let name = format!("{0}/{0}", build.group);
            let outcome = compress_and_publish(
                &name,
                &layout.group_index_path(&build.group),
                prior.index_hash.as_deref(),
                &index_hash,
                layout,
            );
            if let Err(e) = outcome {
                warn!(group = %build.group, error = %e, "group index not published");
                report.failures.push(e);
            }
            self.reporter.bundle_done(&name);
        }
        Ok(())
    }

    fn abort(&mut self, groups: Vec<GroupReport>, group: &str, started: Instant) -> PipelineReport {
        self.transition(PipelineState::Aborted);
        self.reporter.abandon();
        PipelineReport {
            state: self.state,
            groups,
            manifest: None,
            cancelled_at: Some(group.to_string()),
            elapsed: started.elapsed(),
        }
    }

    fn fail(&mut self, error: PackError) -> PackError {
        self.transition(PipelineState::Aborted);
        self.reporter.abandon();
        error
    }
}

/// Compress `artifact` if its hash changed and copy it into the version root
fn compress_and_publish(
    name: &str,
    artifact: &Path,
    prior_hash: Option<&str>,
    new_hash: &str,
    layout: &Layout,
) -> Result<CompressOutcome> {
    let outcome = compress::compress_if_changed(
        name,
        artifact,
        &layout.compressed_path(name),
        prior_hash,
        new_hash,
    )?;
    let published = layout.published_path(name);
    if outcome.was_compressed() || !published.exists() {
        compress::publish(name, outcome.path(), &published)?;
    }
    Ok(outcome)
}

/// Add `outcome` to the report; `true` when the bundle reached the version root
fn record(report: &mut GroupReport, name: &str, outcome: Result<CompressOutcome>) -> bool {
    match outcome {
        Ok(CompressOutcome::Compressed { bytes, .. }) => {
            info!(bundle = name, bytes, "compressed");
            report.compressed.push(name.to_string());
            true
        }
        Ok(CompressOutcome::Skipped { .. }) => {
            info!(bundle = name, "unchanged, compression skipped");
            report.skipped.push(name.to_string());
            true
        }
        Err(e) => {
            warn!(bundle = name, error = %e, "compression failed");
            report.failures.push(e);
            false
        }
    }
}
