//! Build strategy selection
//!
//! Determines whether an acquired source tree is header-only or requires
//! compilation. The decision is a pure function of the tree's file listing,
//! made once per pipeline run and cached; re-invocation returns the same
//! result even if the tree changes afterwards.

use std::path::Path;
use std::sync::OnceLock;

use walkdir::WalkDir;

use crate::error::SourceError;

/// Extensions marking a compiled translation unit when no explicit build
/// indicator is declared
const TRANSLATION_UNIT_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Whether a source tree requires compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Distributed purely as headers; no toolchain invocation
    HeaderOnly,
    /// Contains translation units; requires the native build
    Compiled,
}

/// One-shot, cached build mode decision for a single pipeline run
#[derive(Debug, Default)]
pub struct BuildModeSelector {
    cached: OnceLock<BuildMode>,
}

impl BuildModeSelector {
    /// Create an unresolved selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Determine the build mode, inspecting the tree only on first call
    pub fn determine(
        &self,
        source_root: &Path,
        build_indicator: Option<&str>,
    ) -> Result<BuildMode, SourceError> {
        if let Some(mode) = self.cached.get() {
            return Ok(*mode);
        }
        let mode = inspect_tree(source_root, build_indicator)?;
        Ok(*self.cached.get_or_init(|| mode))
    }
}

/// Inspect a source tree for the build indicator
///
/// With a declared indicator file the tree is `Compiled` iff that file is
/// present. Without one, the tree is `Compiled` iff it contains any
/// translation unit. I/O failures reading the tree are inspection errors,
/// never silently mapped to a mode.
pub fn inspect_tree(
    source_root: &Path,
    build_indicator: Option<&str>,
) -> Result<BuildMode, SourceError> {
    if !source_root.is_dir() {
        return Err(SourceError::SourceInspectionError {
            path: source_root.to_path_buf(),
            error: "not a directory".to_string(),
        });
    }

    if let Some(indicator) = build_indicator {
        let present = source_root.join(indicator).try_exists().map_err(|e| {
            SourceError::SourceInspectionError {
                path: source_root.join(indicator),
                error: e.to_string(),
            }
        })?;
        return Ok(if present {
            BuildMode::Compiled
        } else {
            BuildMode::HeaderOnly
        });
    }

    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry.map_err(|e| SourceError::SourceInspectionError {
            path: source_root.to_path_buf(),
            error: e.to_string(),
        })?;
        let is_translation_unit = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TRANSLATION_UNIT_EXTENSIONS.contains(&ext));
        if entry.file_type().is_file() && is_translation_unit {
            return Ok(BuildMode::Compiled);
        }
    }

    Ok(BuildMode::HeaderOnly)
}
