//! Clean logic
//!
//! Removes build working directories and the packaged output. Downloads and
//! extracted sources are kept by default since they are reusable across
//! configurations; `--all` removes those too.

use std::path::Path;

use crate::config::defaults;
use crate::error::FilesystemError;

/// Directories removed by a default clean
pub const CLEAN_DIRECTORIES: &[&str] = &[defaults::BUILD_DIR, defaults::PACKAGE_DIR];

/// Additional directories removed by `clean --all`
pub const CLEAN_ALL_DIRECTORIES: &[&str] = &[defaults::DOWNLOADS_DIR, defaults::SOURCES_DIR];

/// Result of a clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Directories that were removed
    pub removed: Vec<String>,
    /// Directories that didn't exist (skipped)
    pub skipped: Vec<String>,
}

/// Clean build artifacts from a project workspace
pub fn clean_workspace(project_path: &Path, all: bool) -> Result<CleanResult, FilesystemError> {
    let mut result = CleanResult::default();

    let mut targets: Vec<&str> = CLEAN_DIRECTORIES.to_vec();
    if all {
        targets.extend_from_slice(CLEAN_ALL_DIRECTORIES);
    }

    for dir_name in targets {
        let dir_path = project_path.join(dir_name);

        if dir_path.exists() {
            std::fs::remove_dir_all(&dir_path).map_err(|e| FilesystemError::RemoveDir {
                path: dir_path.clone(),
                error: e.to_string(),
            })?;
            result.removed.push(dir_name.to_string());
        } else {
            result.skipped.push(dir_name.to_string());
        }
    }

    Ok(result)
}

/// Check if a project workspace has any cleanable artifacts
pub fn has_artifacts(project_path: &Path) -> bool {
    CLEAN_DIRECTORIES
        .iter()
        .any(|dir| project_path.join(dir).exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_build_and_package() {
        let project = TempDir::new().unwrap();
        let build_dir = project.path().join("build");
        let package_dir = project.path().join("package");
        std::fs::create_dir_all(build_dir.join("tinyexr-abc123")).unwrap();
        std::fs::create_dir_all(package_dir.join("include")).unwrap();

        let result = clean_workspace(project.path(), false).unwrap();

        assert!(!build_dir.exists());
        assert!(!package_dir.exists());
        assert_eq!(result.removed, vec!["build", "package"]);
    }

    #[test]
    fn test_default_clean_keeps_sources_and_downloads() {
        let project = TempDir::new().unwrap();
        std::fs::create_dir_all(project.path().join("downloads")).unwrap();
        std::fs::create_dir_all(project.path().join("sources")).unwrap();

        clean_workspace(project.path(), false).unwrap();

        assert!(project.path().join("downloads").exists());
        assert!(project.path().join("sources").exists());
    }

    #[test]
    fn test_clean_all_removes_everything() {
        let project = TempDir::new().unwrap();
        for dir in ["build", "package", "downloads", "sources"] {
            std::fs::create_dir_all(project.path().join(dir)).unwrap();
        }

        let result = clean_workspace(project.path(), true).unwrap();

        assert_eq!(result.removed.len(), 4);
        for dir in ["build", "package", "downloads", "sources"] {
            assert!(!project.path().join(dir).exists());
        }
    }

    #[test]
    fn test_clean_succeeds_when_nothing_to_remove() {
        let project = TempDir::new().unwrap();

        let result = clean_workspace(project.path(), false).unwrap();

        assert!(result.removed.is_empty());
        assert_eq!(result.skipped, vec!["build", "package"]);
    }

    #[test]
    fn test_has_artifacts() {
        let project = TempDir::new().unwrap();
        assert!(!has_artifacts(project.path()));

        std::fs::create_dir_all(project.path().join("build")).unwrap();
        assert!(has_artifacts(project.path()));
    }
}
