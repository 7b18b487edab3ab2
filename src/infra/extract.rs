//! Archive extraction
//!
//! Extracts downloaded source archives with the system `tar`, the same way
//! other external tools are invoked in this crate: one blocking child
//! process, exit status checked, stderr captured on failure.

use std::path::Path;
use std::process::Command;

use crate::error::SourceError;

/// Extract a tar archive into a destination directory
///
/// With `strip_root` the archive's single top-level directory is stripped so
/// the source tree lands directly under `dest`.
pub fn extract_archive(archive: &Path, dest: &Path, strip_root: bool) -> Result<(), SourceError> {
    let tar = which::which("tar").map_err(|e| SourceError::ExtractFailed {
        archive: archive.to_path_buf(),
        error: format!("tar not found: {e}"),
    })?;

    std::fs::create_dir_all(dest).map_err(|e| SourceError::ExtractFailed {
        archive: archive.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut command = Command::new(tar);
    command.arg("-xf").arg(archive).arg("-C").arg(dest);
    if strip_root {
        command.arg("--strip-components=1");
    }

    let output = command.output().map_err(|e| SourceError::ExtractFailed {
        archive: archive.to_path_buf(),
        error: e.to_string(),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SourceError::ExtractFailed {
            archive: archive.to_path_buf(),
            error: stderr.trim().to_string(),
        });
    }

    Ok(())
}
