//! Archive extraction with leading-path stripping.
//!
//! Format is dispatched on the file name: `.tar.gz`/`.tgz` through
//! flate2 + tar, `.zip` through the zip crate. `strip` elides a number of
//! leading path components, used when an archive wraps its payload in one
//! root folder.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extract `archive` into `dest`, eliding `strip` leading path components.
///
/// # Errors
///
/// Returns an error for unrecognized archive formats or when an entry
/// cannot be written.
pub fn extract(archive: &Path, dest: &Path, strip: usize) -> Result<()> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive, dest, strip)
    } else if name.ends_with(".zip") {
        extract_zip(archive, dest, strip)
    } else {
        anyhow::bail!("unrecognized archive format: {name}")
    }
}

/// Drop the first `strip` components; `None` when nothing remains.
fn strip_components(path: &Path, strip: usize) -> Option<PathBuf> {
    let stripped: PathBuf = path.components().skip(strip).collect();
    if stripped.as_os_str().is_empty() {
        None
    } else {
        Some(stripped)
    }
}

fn extract_tar_gz(archive: &Path, dest: &Path, strip: usize) -> Result<()> {
    let file = File::open(archive)
        .with_context(|| format!("opening {}", archive.display()))?;
    let mut tar = tar::Archive::new(flate2::read::GzDecoder::new(file));
    for entry in tar.entries().context("reading tar entries")? {
        let mut entry = entry.context("reading tar entry")?;
        let path = entry.path().context("reading entry path")?.into_owned();
        let Some(rel) = strip_components(&path, strip) else {
            continue;
        };
        let out = dest.join(rel);
        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
        } else {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            entry
                .unpack(&out)
                .with_context(|| format!("unpacking {}", out.display()))?;
        }
    }
    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path, strip: usize) -> Result<()> {
    let file = File::open(archive)
        .with_context(|| format!("opening {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file).context("reading zip archive")?;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).context("reading zip entry")?;
        // enclosed_name rejects entries that would escape dest
        let Some(path) = entry.enclosed_name() else {
            continue;
        };
        let Some(rel) = strip_components(&path, strip) else {
            continue;
        };
        let out = dest.join(rel);
        if entry.is_dir() {
            std::fs::create_dir_all(&out)
                .with_context(|| format!("creating {}", out.display()))?;
        } else {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let mut writer = File::create(&out)
                .with_context(|| format!("creating {}", out.display()))?;
            std::io::copy(&mut entry, &mut writer)
                .with_context(|| format!("writing {}", out.display()))?;
        }
    }
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
