//! Source acquisition
//!
//! Fetches a versioned source tree into the workspace: download the archive
//! (skipped when a checksum-valid copy is already cached), verify integrity,
//! and extract. The resulting tree is read-only for the rest of the pipeline
//! and safely reusable across option configurations. A local `path` source
//! bypasses the network for already extracted trees.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::recipe::Recipe;
use crate::error::SourceError;
use crate::infra::download::{verify_checksum, DownloadManager, ProgressCallback};
use crate::infra::extract::extract_archive;

/// Result of source acquisition
#[derive(Debug)]
pub struct AcquiredSource {
    /// Root of the extracted source tree
    pub root: PathBuf,
    /// Whether the archive download was skipped (cache hit)
    pub download_skipped: bool,
}

/// Acquire the recipe's source tree
pub async fn acquire(
    recipe: &Recipe,
    downloads_dir: &Path,
    sources_dir: &Path,
    force: bool,
    progress: Option<ProgressCallback>,
) -> Result<AcquiredSource, SourceError> {
    if let Some(ref path) = recipe.source.path {
        if !path.is_dir() {
            return Err(SourceError::SourceFetchError {
                url: path.display().to_string(),
                error: "local source tree not found".to_string(),
            });
        }
        return Ok(AcquiredSource {
            root: path.clone(),
            download_skipped: true,
        });
    }

    // Recipe validation guarantees url + sha256 when no path is declared
    let Some(url) = recipe.source.url.clone() else {
        return Err(SourceError::SourceFetchError {
            url: String::new(),
            error: "recipe declares no source".to_string(),
        });
    };
    let Some(sha256) = recipe.source.sha256.clone() else {
        return Err(SourceError::SourceFetchError {
            url,
            error: "recipe declares no checksum".to_string(),
        });
    };

    let filename = url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map_or_else(
            || format!("{}-{}.tar.gz", recipe.package.name, recipe.package.version),
            ToString::to_string,
        );
    let archive_path = downloads_dir.join(&filename);

    let mut download_skipped = false;
    if !force && archive_path.exists() && verify_checksum(&archive_path, &sha256).unwrap_or(false) {
        tracing::debug!("Using cached archive {}", archive_path.display());
        download_skipped = true;
    } else {
        tracing::info!("Fetching {url}");
        DownloadManager::new()
            .download_verified(&url, &archive_path, &sha256, progress)
            .await?;
    }

    let source_root = sources_dir.join(format!(
        "{}-{}",
        recipe.package.name, recipe.package.version
    ));

    if force || !source_root.is_dir() {
        let extract_failed = |e: std::io::Error| SourceError::ExtractFailed {
            archive: archive_path.clone(),
            error: e.to_string(),
        };
        if source_root.exists() {
            std::fs::remove_dir_all(&source_root).map_err(extract_failed)?;
        }
        // Extract into a staging directory and rename into place once the
        // archive has fully unpacked; an extraction cut short leaves only
        // the staging directory, which the next run discards, so the source
        // root never holds a partial tree
        let staging = sources_dir.join(format!(
            "{}-{}{}",
            recipe.package.name,
            recipe.package.version,
            defaults::EXTRACT_STAGING_SUFFIX
        ));
        if staging.exists() {
            std::fs::remove_dir_all(&staging).map_err(extract_failed)?;
        }
        extract_archive(&archive_path, &staging, recipe.source.strip_root)?;
        std::fs::rename(&staging, &source_root).map_err(extract_failed)?;
    }

    Ok(AcquiredSource {
        root: source_root,
        download_skipped,
    })
}
