//! Bundle builder
//!
//! Every immediate sub-directory of a group's source root is one bundle. The
//! builder keeps only the dirty ones and hands them to the [`Packager`] in a
//! single call. Bundle records and the group index are only updated by
//! [`record_group`] once a bundle has been compressed and published, so a
//! bundle whose distribution copy was not refreshed stays dirty.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{BundleGroup, PackSettings};
use crate::detect;
use crate::error::fs::read_err;
use crate::error::{Result, cancelled, packaging_failed};
use crate::hash;
use crate::layout::Layout;
use crate::packager::{BundleBuild, PackManifest, Packager, PriorSnapshot};
use crate::path_utils;

/// Everything a group build needs besides the group itself
pub struct BuildContext<'a, P: Packager> {
    pub settings: &'a PackSettings,
    pub layout: &'a Layout,
    pub packager: &'a P,
    pub cancel: Arc<AtomicBool>,
}

impl<P: Packager> BuildContext<'_, P> {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// A bundle directory found under a group root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSource {
    /// Relative key, e.g. `UI/icons.bundle`
    pub name: String,
    pub dir: PathBuf,
}

/// Outcome of building one group
#[derive(Debug, Clone, Default)]
pub struct GroupBuild {
    pub group: String,
    /// Every bundle discovered under the group root
    pub bundles: Vec<String>,
    /// Bundles that were packaged in this run
    pub dirty: Vec<String>,
    /// Content hashes reported by the packager for `dirty`
    pub manifest: PackManifest,
    /// When the packager was invoked
    pub started: Option<DateTime<Utc>>,
}

impl GroupBuild {
    fn empty(group: &str) -> Self {
        Self {
            group: group.to_string(),
            ..Self::default()
        }
    }

    pub fn is_packaged(&self) -> bool {
        !self.dirty.is_empty()
    }
}

/// List the bundle directories of `group`, sorted by name
pub fn discover_bundles(
    group: &BundleGroup,
    settings: &PackSettings,
    layout: &Layout,
) -> Result<Vec<BundleSource>> {
    let root = group.source_root(&layout.resource_root);
    if !root.is_dir() {
        warn!(group = %group.name, root = %root.display(), "group root does not exist");
        return Ok(Vec::new());
    }

    let mut sources = Vec::new();
    for entry in fs::read_dir(&root).map_err(read_err(&root))? {
        let entry = entry.map_err(read_err(&root))?;
        if !entry.file_type().map_err(read_err(&root))?.is_dir() {
            continue;
        }
        let leaf = entry.file_name().to_string_lossy().to_string();
        sources.push(BundleSource {
            name: path_utils::bundle_key(&group.name, &leaf, &settings.bundle_postfix),
            dir: entry.path(),
        });
    }
    sources.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(sources)
}

/// Package the dirty bundles of `group`
///
/// The packager is not invoked when nothing is dirty. Its reported hashes
/// are opaque content identifiers; every dirty bundle must have one.
pub fn build_group<P: Packager>(
    ctx: &BuildContext<'_, P>,
    group: &BundleGroup,
    force: bool,
) -> Result<GroupBuild> {
    let mut result = GroupBuild::empty(&group.name);
    let sources = discover_bundles(group, ctx.settings, ctx.layout)?;

    let mut requests = Vec::new();
    for source in sources {
        if ctx.is_cancelled() {
            return Err(cancelled(&group.name));
        }
        let assets = detect::collect_assets(&source.dir, ctx.settings)?;
        let info = group.bundles.iter().find(|b| b.name == source.name);
        let dirty = detect::needs_rebuild(info, &assets, force);
        debug!(
            bundle = %source.name,
            assets = assets.len(),
            changed = detect::changed_assets(info, &assets).len(),
            dirty,
            "checked"
        );

        result.bundles.push(source.name.clone());
        if dirty {
            requests.push(BundleBuild {
                name: source.name,
                assets,
            });
        }
    }

    if requests.is_empty() {
        info!(group = %group.name, "up to date");
        return Ok(result);
    }

    info!(group = %group.name, bundles = requests.len(), "packaging");
    let started = Utc::now();
    let manifest = ctx
        .packager
        .package(&ctx.layout.platform_root, &requests, ctx.layout.platform)
        .map_err(|e| packaging_failed(&group.name, e.to_string()))?;
    debug!(group = %group.name, artifacts = manifest.len(), "packager finished");

    for request in &requests {
        if manifest.bundle_hash(&request.name).is_none() {
            return Err(packaging_failed(
                &group.name,
                format!("no artifact reported for '{}'", request.name),
            ));
        }
        result.dirty.push(request.name.clone());
    }
    result.started = Some(started);
    result.manifest = manifest;

    Ok(result)
}

/// Record the bundles of `build` that reached the distribution tree
///
/// Each bundle in `published` gets its record stamped and its reported hash
/// written to the group index. Every other entry keeps its prior hash, so a
/// bundle that failed or was never reached is rebuilt and recompressed on
/// the next run. Returns the hash of the index file, or `None` when there
/// was nothing to record.
pub fn record_group(
    layout: &Layout,
    group: &mut BundleGroup,
    build: &GroupBuild,
    published: &[String],
    prior: &PriorSnapshot,
) -> Result<Option<String>> {
    let Some(started) = build.started else {
        return Ok(None);
    };

    let mut recorded = PackManifest::new();
    for name in published {
        let Some(content_hash) = build.manifest.bundle_hash(name) else {
            continue;
        };
        let artifact = layout.artifact_path(name);
        let size = fs::metadata(&artifact).map_err(read_err(&artifact))?.len();
        group
            .bundle_entry(name)
            .mark_built(started, &layout.version, size);
        recorded.insert(name.as_str(), content_hash);
    }

    let index_path = layout.group_index_path(&group.name);
    prior.manifest.merged_with(&recorded).save(&index_path)?;
    debug!(group = %group.name, recorded = recorded.len(), "group index written");
    Ok(Some(hash::hash_file(&index_path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleConfig;
    use crate::error::PackError;
    use crate::packager::TarPackager;
    use crate::platform::Platform;
    use crate::test_fixtures::{FailingPackager, TestProject};
    use chrono::Duration;
    use std::path::Path;

    fn context<'a, P: Packager>(
        config: &'a BundleConfig,
        layout: &'a Layout,
        packager: &'a P,
    ) -> BuildContext<'a, P> {
        BuildContext {
            settings: &config.settings,
            layout,
            packager,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reports an opaque engine-style hash instead of a file hash
    struct OpaqueHashPackager;

    impl Packager for OpaqueHashPackager {
        fn package(&self, out_dir: &Path, requests: &[BundleBuild], platform: Platform) -> Result<PackManifest> {
            let built = TarPackager.package(out_dir, requests, platform)?;
            let mut manifest = PackManifest::new();
            for name in built.bundles.keys() {
                manifest.insert(name.as_str(), "hash128:0123456789abcdef0123456789abcdef");
            }
            Ok(manifest)
        }
    }

    /// Packages the requested bundles but reports none of them
    struct SilentPackager;

    impl Packager for SilentPackager {
        fn package(&self, out_dir: &Path, requests: &[BundleBuild], platform: Platform) -> Result<PackManifest> {
            TarPackager.package(out_dir, requests, platform)?;
            Ok(PackManifest::new())
        }
    }

    #[test]
    fn test_discover_bundles_sorted() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/panels/a.png", "a");
        project.write_asset("UI/icons/b.png", "b");
        project.write_asset("UI/loose.txt", "not a bundle");
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let names: Vec<String> = discover_bundles(&config.groups[0], &config.settings, &layout)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["UI/icons.bundle", "UI/panels.bundle"]);
    }

    #[test]
    fn test_missing_group_root_builds_nothing() {
        let project = TestProject::new(&["Audio"]);
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let build = build_group(&context(&config, &layout, &TarPackager), &config.groups[0], false)
            .unwrap();
        assert!(build.bundles.is_empty());
        assert!(!build.is_packaged());
        assert!(build.started.is_none());
    }

    #[test]
    fn test_build_group_packages_without_stamping() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let build = build_group(&context(&config, &layout, &TarPackager), &config.groups[0], false)
            .unwrap();
        assert_eq!(build.dirty, vec!["UI/icons.bundle"]);
        assert!(build.started.is_some());
        assert!(layout.artifact_path("UI/icons.bundle").exists());
        assert!(config.bundle_info("UI/icons.bundle").is_none());
        assert!(!layout.group_index_path("UI").exists());
    }

    #[test]
    fn test_record_group_stamps_published_bundles() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let mut config = project.config();
        let layout = project.layout(&config, Platform::Android);
        let snapshot = config.clone();
        let build = build_group(&context(&snapshot, &layout, &TarPackager), &config.groups[0], false)
            .unwrap();

        let index_hash = record_group(
            &layout,
            &mut config.groups[0],
            &build,
            &build.dirty,
            &PriorSnapshot::default(),
        )
        .unwrap();

        let info = config.bundle_info("UI/icons.bundle").unwrap();
        assert_eq!(info.build_time, build.started);
        assert_eq!(info.version, "1.0.0");
        assert_eq!(
            info.size,
            fs::metadata(layout.artifact_path("UI/icons.bundle")).unwrap().len()
        );

        let index_path = layout.group_index_path("UI");
        assert_eq!(index_hash, Some(hash::hash_file(&index_path).unwrap()));
        let index = PriorSnapshot::load(&index_path).unwrap();
        assert_eq!(
            index.hash_of("UI/icons.bundle"),
            build.manifest.bundle_hash("UI/icons.bundle")
        );
    }

    #[test]
    fn test_record_group_keeps_prior_hash_of_unpublished() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        project.write_asset("UI/panels/b.png", "b");
        let mut config = project.config();
        let layout = project.layout(&config, Platform::Android);
        let snapshot = config.clone();
        let build = build_group(&context(&snapshot, &layout, &TarPackager), &config.groups[0], false)
            .unwrap();

        let mut prior = PriorSnapshot::default();
        prior.manifest.insert("UI/panels.bundle", "blake3:old");
        prior.manifest.insert("UI/retired.bundle", "blake3:gone");
        let published = vec!["UI/icons.bundle".to_string()];
        record_group(&layout, &mut config.groups[0], &build, &published, &prior).unwrap();

        let index = PriorSnapshot::load(&layout.group_index_path("UI")).unwrap();
        assert_eq!(index.hash_of("UI/panels.bundle"), Some("blake3:old"));
        assert_eq!(index.hash_of("UI/retired.bundle"), Some("blake3:gone"));
        assert_eq!(
            index.hash_of("UI/icons.bundle"),
            build.manifest.bundle_hash("UI/icons.bundle")
        );
        assert!(config.bundle_info("UI/panels.bundle").is_none());
    }

    #[test]
    fn test_nothing_to_record_without_packaging() {
        let project = TestProject::new(&["UI"]);
        let mut config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let recorded = record_group(
            &layout,
            &mut config.groups[0],
            &GroupBuild::empty("UI"),
            &[],
            &PriorSnapshot::default(),
        )
        .unwrap();
        assert!(recorded.is_none());
        assert!(!layout.group_index_path("UI").exists());
    }

    #[test]
    fn test_clean_bundles_are_not_packaged() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let mut config = project.config();
        config.groups[0].bundle_entry("UI/icons.bundle").build_time =
            Some(Utc::now() + Duration::hours(1));
        let layout = project.layout(&config, Platform::Android);

        let build = build_group(&context(&config, &layout, &FailingPackager), &config.groups[0], false)
            .unwrap();
        assert_eq!(build.bundles, vec!["UI/icons.bundle"]);
        assert!(!build.is_packaged());
    }

    #[test]
    fn test_packager_failure_is_group_scoped() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let err = build_group(&context(&config, &layout, &FailingPackager), &config.groups[0], false)
            .unwrap_err();
        assert!(matches!(err, PackError::PackagingFailed { ref group, .. } if group == "UI"));
    }

    #[test]
    fn test_opaque_packager_hashes_are_accepted() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let build = build_group(
            &context(&config, &layout, &OpaqueHashPackager),
            &config.groups[0],
            false,
        )
        .unwrap();
        assert_eq!(build.dirty, vec!["UI/icons.bundle"]);
        assert_eq!(
            build.manifest.bundle_hash("UI/icons.bundle"),
            Some("hash128:0123456789abcdef0123456789abcdef")
        );
    }

    #[test]
    fn test_unreported_bundle_fails_group() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);

        let err = build_group(&context(&config, &layout, &SilentPackager), &config.groups[0], false)
            .unwrap_err();
        assert!(err.to_string().contains("no artifact reported for 'UI/icons.bundle'"));
    }

    #[test]
    fn test_cancelled_before_packaging() {
        let project = TestProject::new(&["UI"]);
        project.write_asset("UI/icons/a.png", "a");
        let config = project.config();
        let layout = project.layout(&config, Platform::Android);
        let ctx = context(&config, &layout, &TarPackager);
        ctx.cancel.store(true, Ordering::SeqCst);

        let err = build_group(&ctx, &config.groups[0], false).unwrap_err();
        assert!(matches!(err, PackError::Cancelled { .. }));
        assert!(!layout.artifact_path("UI/icons.bundle").exists());
    }
}
