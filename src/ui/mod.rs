//! Progress presentation
//!
//! The pipeline reports progress through the [`ProgressReporter`] trait:
//! one bar for groups and, while a group compresses, one for its bundles.
//! `--quiet` and tests use [`SilentProgressReporter`].

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter trait for a pipeline run
pub trait ProgressReporter {
    /// Show the group being processed
    fn start_group(&mut self, group: &str, current: usize, total: usize);

    /// Start per-bundle progress for the current group
    fn init_bundle_progress(&mut self, total_bundles: u64);

    /// A bundle of the current group finished compressing
    fn bundle_done(&mut self, bundle: &str);

    /// The current group finished
    fn finish_group(&mut self);

    /// The whole run finished
    fn finish(&mut self);

    /// Abandon on error or cancellation
    fn abandon(&mut self);
}

/// Interactive progress reporter with visual progress bars
pub struct InteractiveProgressReporter {
    group_pb: ProgressBar,
    bundle_pb: Option<ProgressBar>,
}

fn style(template: &str, chars: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(chars)
}

impl InteractiveProgressReporter {
    /// Create a reporter for `total_groups` groups
    pub fn new(total_groups: u64) -> Self {
        let group_pb = ProgressBar::new(total_groups);
        group_pb.set_style(style("[{bar:40.cyan/blue}] {pos}/{len} {msg}", "#>-"));
        Self {
            group_pb,
            bundle_pb: None,
        }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start_group(&mut self, group: &str, current: usize, total: usize) {
        self.group_pb
            .set_message(format!("({current}/{total}) {group}"));
    }

    fn init_bundle_progress(&mut self, total_bundles: u64) {
        let bundle_pb = ProgressBar::new(total_bundles);
        bundle_pb.set_style(style(
            "  [{bar:40.green/yellow}] {pos}/{len} bundles {msg}",
            "█▉▊▋▌▍▎▏  ",
        ));
        self.bundle_pb = Some(bundle_pb);
    }

    fn bundle_done(&mut self, bundle: &str) {
        if let Some(ref bundle_pb) = self.bundle_pb {
            bundle_pb.set_message(bundle.to_string());
            bundle_pb.inc(1);
        }
    }

    fn finish_group(&mut self) {
        if let Some(bundle_pb) = self.bundle_pb.take() {
            bundle_pb.finish_and_clear();
        }
        self.group_pb.inc(1);
    }

    fn finish(&mut self) {
        self.group_pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        if let Some(ref bundle_pb) = self.bundle_pb {
            bundle_pb.abandon();
        }
        self.group_pb.abandon();
    }
}

/// No-op reporter for quiet mode and tests
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_group(&mut self, _group: &str, _current: usize, _total: usize) {}

    fn init_bundle_progress(&mut self, _total_bundles: u64) {}

    fn bundle_done(&mut self, _bundle: &str) {}

    fn finish_group(&mut self) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
