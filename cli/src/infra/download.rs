//! Infrastructure implementation of the `Downloader` port.
//!
//! Streams a remote archive into a destination directory with progress
//! feedback, then optionally decompresses it in place. Failures past
//! destination setup are reported and swallowed — acquisition partially
//! failing must not crash a larger multi-step flow, so callers inspect the
//! resulting filesystem state instead of catching errors.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{Downloader, FetchOptions};
use crate::infra::archive;
use crate::output::progress;

/// Production downloader over blocking HTTP.
pub struct UreqDownloader {
    /// Suppress progress output.
    pub quiet: bool,
}

impl Downloader for UreqDownloader {
    fn fetch(&self, url: &str, dest: &Path, opts: &FetchOptions) -> Result<()> {
        std::fs::create_dir_all(dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;
        if let Err(e) = self.try_fetch(url, dest, opts) {
            eprintln!("Warning: download of {url} failed: {e}");
        }
        Ok(())
    }
}

impl UreqDownloader {
    fn try_fetch(&self, url: &str, dest: &Path, opts: &FetchOptions) -> Result<()> {
        // A failed probe only costs us the determinate progress bar.
        let total = head_content_length(url);

        let response = match ureq::get(url).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => anyhow::bail!("download failed: HTTP {code}"),
            Err(_) => anyhow::bail!("download interrupted"),
        };

        let pb = if self.quiet {
            indicatif::ProgressBar::hidden()
        } else if let Some(total) = total {
            progress::bar(total, "downloading")
        } else {
            progress::spinner("downloading")
        };

        let target = dest.join(archive_filename(url));
        let mut file = std::fs::File::create(&target)
            .with_context(|| format!("creating {}", target.display()))?;
        let mut reader = response.into_reader();
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf).context("download interrupted")?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).context("download interrupted")?;
            pb.inc(n as u64);
        }
        pb.finish_and_clear();
        drop(file);

        if opts.extract {
            extract_in_place(dest, opts)?;
        }
        Ok(())
    }
}

/// Probe the remote for a Content-Length; failures select an indeterminate
/// spinner instead of a bar.
fn head_content_length(url: &str) -> Option<u64> {
    let response = ureq::head(url).call().ok()?;
    response.header("Content-Length")?.parse().ok()
}

/// Pick a local file name for the downloaded archive from the URL path.
fn archive_filename(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or_default();
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if name.is_empty() {
        "archive".to_string()
    } else {
        name
    }
}

/// Decompress the single downloaded entry of `dest` in place.
///
/// An archive served without an extension is renamed to carry the
/// configured postfix first, so format dispatch can see it. The archive
/// file is removed after successful extraction.
fn extract_in_place(dest: &Path, opts: &FetchOptions) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dest)
        .with_context(|| format!("reading {}", dest.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    let Some(mut archive_path) = entries.into_iter().next() else {
        anyhow::bail!("nothing was downloaded into {}", dest.display());
    };

    if let Some(postfix) = &opts.postfix
        && archive_path.extension().is_none()
    {
        let renamed = archive_path.with_extension(postfix);
        std::fs::rename(&archive_path, &renamed)
            .with_context(|| format!("renaming {}", archive_path.display()))?;
        archive_path = renamed;
    }

    archive::extract(&archive_path, dest, opts.strip)?;
    std::fs::remove_file(&archive_path)
        .with_context(|| format!("removing {}", archive_path.display()))?;
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
