//! Command helper utilities

use std::path::{Path, PathBuf};

use console::Term;

use crate::config::{BundleConfig, resolve_config_path};
use crate::error::Result;
use crate::layout::Layout;
use crate::platform::Platform;
use crate::ui::{InteractiveProgressReporter, ProgressReporter, SilentProgressReporter};

/// A loaded project: store path, its directory, and the store itself
pub struct Project {
    pub config_path: PathBuf,
    pub root: PathBuf,
    pub config: BundleConfig,
}

impl Project {
    /// Resolve and load the store named by `--config`, `ASSETPACK_CONFIG` or the working directory
    pub fn load(config: Option<PathBuf>) -> Result<Self> {
        let config_path = resolve_config_path(config)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let config = BundleConfig::load(&config_path)?;
        Ok(Self {
            config_path,
            root,
            config,
        })
    }

    pub fn layout(&self, platform: Platform) -> Layout {
        Layout::new(&self.config, &self.root, platform)
    }
}

/// Progress bars only when stderr is a terminal and output is not silenced
pub fn progress_reporter(quiet: bool, total_groups: u64) -> Box<dyn ProgressReporter> {
    if quiet || !Term::stderr().is_term() {
        Box::new(SilentProgressReporter)
    } else {
        Box::new(InteractiveProgressReporter::new(total_groups))
    }
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
