//! Deterministic tar packager
//!
//! Entries are sorted by path and carry zeroed timestamps and ownership, so
//! identical assets always produce byte-identical artifacts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::common::fs as common_fs;
use crate::error::Result;
use crate::error::fs::{read_err, write_err, write_failed};
use crate::hash;
use crate::packager::{BundleBuild, PackManifest, Packager};
use crate::platform::Platform;

/// Packs each bundle's assets into an uncompressed tar archive
#[derive(Debug, Default, Clone, Copy)]
pub struct TarPackager;

impl TarPackager {
    fn write_bundle(out_dir: &Path, request: &BundleBuild) -> Result<String> {
        let target = out_dir.join(&request.name);
        let parent = target.parent().unwrap_or(out_dir);
        common_fs::ensure_dir(parent)?;

        let tmp = NamedTempFile::new_in(parent).map_err(write_err(&target))?;
        let mut builder = ::tar::Builder::new(tmp);
        builder.mode(::tar::HeaderMode::Deterministic);

        let mut assets: Vec<_> = request.assets.iter().collect();
        assets.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

        for asset in assets {
            let file = File::open(&asset.path).map_err(read_err(&asset.path))?;
            let len = file.metadata().map_err(read_err(&asset.path))?.len();

            let mut header = ::tar::Header::new_gnu();
            header.set_size(len);
            header.set_mode(0o644);
            header.set_mtime(0);
            header.set_uid(0);
            header.set_gid(0);
            header.set_entry_type(::tar::EntryType::Regular);
            builder
                .append_data(&mut header, &asset.rel_path, file)
                .map_err(write_err(&target))?;
        }

        let mut tmp = builder.into_inner().map_err(write_err(&target))?;
        tmp.flush().map_err(write_err(&target))?;
        tmp.persist(&target)
            .map_err(|e| write_failed(target.display().to_string(), e.error.to_string()))?;

        hash::hash_file(&target)
    }
}

impl Packager for TarPackager {
    fn package(
        &self,
        out_dir: &Path,
        requests: &[BundleBuild],
        platform: Platform,
    ) -> Result<PackManifest> {
        let mut manifest = PackManifest::new();
        for request in requests {
            let hash = Self::write_bundle(out_dir, request)?;
            debug!(bundle = %request.name, %platform, %hash, assets = request.assets.len(), "packed");
            manifest.insert(request.name.clone(), hash);
        }
        Ok(manifest)
    }
}
