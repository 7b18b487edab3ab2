//! HTTP download functionality
//!
//! Streams source archives to disk with progress reporting and SHA256
//! verification. Fetch failures are surfaced immediately and never retried
//! here: they abort the pipeline, and retry policy belongs to the caller's
//! surrounding environment.

use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::config::defaults;
use crate::error::SourceError;

/// Progress callback type for download progress reporting
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Download result containing file path and metadata
#[derive(Debug)]
pub struct DownloadResult {
    /// Path to the downloaded file
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// SHA256 checksum of the downloaded content
    pub checksum: String,
}

/// Download manager for fetching source archives
#[derive(Debug, Clone)]
pub struct DownloadManager {
    /// HTTP client
    client: reqwest::Client,
}

impl DownloadManager {
    /// Create a new download manager
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(defaults::DOWNLOAD_TIMEOUT_SECS))
                .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Download a file, streaming to disk and hashing on the fly
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadResult, SourceError> {
        let fetch_error = |error: String| SourceError::SourceFetchError {
            url: url.to_string(),
            error,
        };

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| fetch_error(e.to_string()))?;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP status {}", response.status())));
        }

        let total = response.content_length().unwrap_or(0);
        let mut file = File::create(dest)
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let mut hasher = Sha256::new();
        let mut size: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| fetch_error(e.to_string()))?;
            hasher.update(&chunk);
            size += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| fetch_error(e.to_string()))?;
            if let Some(ref callback) = progress {
                callback(size, total);
            }
        }

        file.flush().await.map_err(|e| fetch_error(e.to_string()))?;

        Ok(DownloadResult {
            path: dest.to_path_buf(),
            size,
            checksum: hex::encode(hasher.finalize()),
        })
    }

    /// Download a file and verify its SHA256 checksum
    ///
    /// A mismatching file is deleted so the next invocation cannot pick up
    /// a corrupt archive.
    pub async fn download_verified(
        &self,
        url: &str,
        dest: &Path,
        expected_sha256: &str,
        progress: Option<ProgressCallback>,
    ) -> Result<DownloadResult, SourceError> {
        let result = self.download(url, dest, progress).await?;

        if !result.checksum.eq_ignore_ascii_case(expected_sha256) {
            let actual = result.checksum.clone();
            let _ = tokio::fs::remove_file(dest).await;
            return Err(SourceError::ChecksumMismatch {
                file: dest.display().to_string(),
                expected: expected_sha256.to_string(),
                actual,
            });
        }

        Ok(result)
    }
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify the SHA256 checksum of a file on disk
pub fn verify_checksum(path: &Path, expected_sha256: &str) -> Result<bool, SourceError> {
    let data = std::fs::read(path).map_err(|e| SourceError::SourceInspectionError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    let actual = hex::encode(Sha256::digest(&data));
    Ok(actual.eq_ignore_ascii_case(expected_sha256))
}
