//! LZMA compression of bundle artifacts
//!
//! Artifacts are compressed into the legacy `.lzma` ("alone") container at a
//! fixed preset, which makes the output a pure function of the input bytes.
//! Every output is written to a temp file first and renamed into place.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use xz2::read::XzDecoder;
use xz2::stream::{LzmaOptions, Stream};
use xz2::write::XzEncoder;

use crate::common::fs as common_fs;
use crate::config::PackSettings;
use crate::error::{PackError, Result, compression_failed};
use crate::error::fs::{read_err, write_err, write_failed};
use crate::path_utils;

/// LZMA preset used for every artifact
pub const LZMA_PRESET: u32 = 6;

/// Upper bound for decoder memory
const DECODER_MEMLIMIT: u64 = u64::MAX;

/// What `compress_if_changed` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressOutcome {
    /// A new compressed file was written
    Compressed { path: PathBuf, bytes: u64 },
    /// The existing compressed file is current
    Skipped { path: PathBuf },
}

impl CompressOutcome {
    pub fn path(&self) -> &Path {
        match self {
            CompressOutcome::Compressed { path, .. } | CompressOutcome::Skipped { path } => path,
        }
    }

    pub fn was_compressed(&self) -> bool {
        matches!(self, CompressOutcome::Compressed { .. })
    }
}

/// Compress `src` into `dst`, returning the compressed size
pub fn compress_file(src: &Path, dst: &Path) -> Result<u64> {
    let parent = dst.parent().unwrap_or_else(|| Path::new("."));
    common_fs::ensure_dir(parent)?;

    let options = LzmaOptions::new_preset(LZMA_PRESET)
        .map_err(|e| compression_failed(src.display().to_string(), e.to_string()))?;
    let stream = Stream::new_lzma_encoder(&options)
        .map_err(|e| compression_failed(src.display().to_string(), e.to_string()))?;

    let mut input = BufReader::new(File::open(src).map_err(read_err(src))?);
    let tmp = NamedTempFile::new_in(parent).map_err(write_err(dst))?;
    let mut encoder = XzEncoder::new_stream(BufWriter::new(tmp), stream);
    std::io::copy(&mut input, &mut encoder).map_err(write_err(dst))?;

    let mut writer = encoder.finish().map_err(write_err(dst))?;
    writer.flush().map_err(write_err(dst))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| write_failed(dst.display().to_string(), e.to_string()))?;
    let bytes = tmp.as_file().metadata().map_err(write_err(dst))?.len();
    tmp.persist(dst)
        .map_err(|e| write_failed(dst.display().to_string(), e.error.to_string()))?;

    Ok(bytes)
}

/// Decompress an `.lzma` file produced by [`compress_file`]
#[allow(dead_code)]
pub fn decompress_file(src: &Path, dst: &Path) -> Result<u64> {
    let parent = dst.parent().unwrap_or_else(|| Path::new("."));
    common_fs::ensure_dir(parent)?;

    let stream = Stream::new_lzma_decoder(DECODER_MEMLIMIT)
        .map_err(|e| compression_failed(src.display().to_string(), e.to_string()))?;
    let input = BufReader::new(File::open(src).map_err(read_err(src))?);
    let mut decoder = XzDecoder::new_stream(input, stream);

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err(dst))?;
    let bytes = std::io::copy(&mut decoder, tmp.as_file_mut()).map_err(read_err(src))?;
    tmp.persist(dst)
        .map_err(|e| write_failed(dst.display().to_string(), e.error.to_string()))?;
    Ok(bytes)
}

/// Compress `artifact` into `compressed` unless it is already current
///
/// Compression runs when the content hash changed since the prior snapshot,
/// or when the compressed file is missing.
pub fn compress_if_changed(
    name: &str,
    artifact: &Path,
    compressed: &Path,
    prior_hash: Option<&str>,
    new_hash: &str,
) -> Result<CompressOutcome> {
    let compressed = compressed.to_path_buf();
    let unchanged = prior_hash.is_some_and(|prior| prior == new_hash);
    if unchanged && compressed.exists() {
        debug!(bundle = name, hash = new_hash, "compressed artifact is current");
        return Ok(CompressOutcome::Skipped { path: compressed });
    }

    debug!(
        bundle = name,
        new = new_hash,
        prior = prior_hash.unwrap_or("<none>"),
        "compressing"
    );
    let bytes = compress_file(artifact, &compressed)
        .map_err(|e| compression_failed(name, e.to_string()))?;
    Ok(CompressOutcome::Compressed {
        path: compressed,
        bytes,
    })
}

/// Copy a compressed artifact into the distribution tree
pub fn publish(name: &str, compressed: &Path, published: &Path) -> Result<()> {
    common_fs::copy_replace(compressed, published)
        .map_err(|e| compression_failed(name, format!("publish failed: {e}")))
}

/// Result of bulk-compressing a directory
#[derive(Debug, Default)]
pub struct CompressDirReport {
    pub compressed: Vec<PathBuf>,
    pub failed: Vec<PackError>,
}

/// Compress every file under `dir` into `dest_root`, mirroring relative paths
///
/// Skips `.manifest` files, files that are already compressed, and anything
/// already inside `dest_root`. Per-file failures are collected, not returned.
pub fn compress_dir(dir: &Path, dest_root: &Path, settings: &PackSettings) -> Result<CompressDirReport> {
    let mut report = CompressDirReport::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.starts_with(dest_root)
            || settings.is_compressed(path)
            || path.extension().is_some_and(|ext| ext == "manifest")
        {
            continue;
        }
        let Some(rel) = path_utils::relative_key(dir, path) else {
            continue;
        };

        let target = settings.compressed_path(&dest_root.join(&rel));
        match compress_file(path, &target) {
            Ok(bytes) => {
                info!(file = %rel, bytes, "compressed");
                report.compressed.push(target);
            }
            Err(e) => {
                warn!(file = %rel, error = %e, "compression failed");
                report.failed.push(compression_failed(rel, e.to_string()));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compress_round_trip() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("icons.bundle");
        let payload: Vec<u8> = (0..10_000u32).flat_map(|i| (i % 7).to_le_bytes()).collect();
        std::fs::write(&src, &payload).unwrap();

        let lzma = temp.path().join("icons.bundle.lzma");
        let bytes = compress_file(&src, &lzma).unwrap();
        assert!(bytes > 0);
        assert!(bytes < payload.len() as u64);

        let out = temp.path().join("restored.bundle");
        decompress_file(&lzma, &out).unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), payload);
    }

    #[test]
    fn test_compression_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.bundle");
        std::fs::write(&src, "the same bytes every time").unwrap();

        compress_file(&src, &temp.path().join("one.lzma")).unwrap();
        compress_file(&src, &temp.path().join("two.lzma")).unwrap();
        assert_eq!(
            std::fs::read(temp.path().join("one.lzma")).unwrap(),
            std::fs::read(temp.path().join("two.lzma")).unwrap()
        );
    }

    #[test]
    fn test_compress_if_changed_skips_current() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("a.bundle");
        std::fs::write(&artifact, "content").unwrap();

        let lzma = temp.path().join("a.bundle.lzma");
        let first = compress_if_changed("UI/a.bundle", &artifact, &lzma, None, "blake3:1").unwrap();
        assert!(first.was_compressed());

        let second =
            compress_if_changed("UI/a.bundle", &artifact, &lzma, Some("blake3:1"), "blake3:1")
                .unwrap();
        assert_eq!(
            second,
            CompressOutcome::Skipped {
                path: temp.path().join("a.bundle.lzma")
            }
        );
    }

    #[test]
    fn test_compress_if_changed_on_hash_change() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("a.bundle");
        std::fs::write(&artifact, "content").unwrap();
        let lzma = temp.path().join("a.bundle.lzma");
        compress_if_changed("UI/a.bundle", &artifact, &lzma, None, "blake3:1").unwrap();

        let outcome =
            compress_if_changed("UI/a.bundle", &artifact, &lzma, Some("blake3:1"), "blake3:2")
                .unwrap();
        assert!(outcome.was_compressed());
    }

    #[test]
    fn test_compress_if_changed_when_output_missing() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("a.bundle");
        std::fs::write(&artifact, "content").unwrap();

        let lzma = temp.path().join("a.bundle.lzma");
        let outcome =
            compress_if_changed("UI/a.bundle", &artifact, &lzma, Some("blake3:1"), "blake3:1")
                .unwrap();
        assert!(outcome.was_compressed());
        assert!(lzma.exists());
    }

    #[test]
    fn test_compress_missing_artifact_fails_for_that_bundle() {
        let temp = TempDir::new().unwrap();
        let err = compress_if_changed(
            "UI/ghost.bundle",
            &temp.path().join("ghost.bundle"),
            &temp.path().join("ghost.bundle.lzma"),
            None,
            "blake3:1",
        )
        .unwrap_err();
        assert!(matches!(err, PackError::CompressionFailed { ref bundle, .. } if bundle == "UI/ghost.bundle"));
    }

    #[test]
    fn test_publish_copies() {
        let temp = TempDir::new().unwrap();
        let compressed = temp.path().join("a.bundle.lzma");
        std::fs::write(&compressed, "xz").unwrap();
        let published = temp.path().join("1.0.0/UI/a.bundle.lzma");

        publish("UI/a.bundle", &compressed, &published).unwrap();
        assert_eq!(std::fs::read(&published).unwrap(), b"xz");
    }

    #[test]
    fn test_compress_dir_skips_manifests_and_compressed() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Android");
        std::fs::create_dir_all(dir.join("UI")).unwrap();
        std::fs::write(dir.join("UI/a.bundle"), "a").unwrap();
        std::fs::write(dir.join("UI/a.bundle.manifest"), "m").unwrap();
        std::fs::write(dir.join("UI/a.bundle.lzma"), "old").unwrap();
        std::fs::write(dir.join("UI/UI"), "index").unwrap();

        let dest = dir.join("1.0.0");
        let report = compress_dir(&dir, &dest, &PackSettings::default()).unwrap();

        assert!(report.failed.is_empty());
        assert_eq!(
            report.compressed,
            vec![dest.join("UI/UI.lzma"), dest.join("UI/a.bundle.lzma")]
        );
    }
}
