//! Artifact packaging
//!
//! Collects produced files into the canonical package layout:
//! `include/` for public headers, `lib/` for static and shared libraries,
//! `bin/` for executables and Windows-style runtime files, and
//! `licenses/LICENSE`. Files are copied, never moved, so the build and
//! source trees stay reusable. Packaging is idempotent: re-running with
//! unchanged inputs reproduces a byte-identical output tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::defaults;
use crate::core::build_mode::BuildMode;
use crate::core::license;
use crate::core::recipe::Recipe;
use crate::error::{FilesystemError, ForgeError};
use crate::infra::filesystem;

/// Classification of a produced file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Public header
    Header,
    /// Static library (`.a`, `.lib`)
    StaticLib,
    /// Shared library (`.so`, `.dylib`, `.dll`)
    SharedLib,
    /// Executable (`.exe`)
    Binary,
}

/// Classify a produced file by extension, per platform library conventions
pub fn classify(file_name: &str) -> Option<ArtifactKind> {
    let extension = Path::new(file_name).extension()?.to_str()?;
    match extension {
        "h" | "hpp" | "hxx" => Some(ArtifactKind::Header),
        "a" | "lib" => Some(ArtifactKind::StaticLib),
        "so" | "dylib" | "dll" => Some(ArtifactKind::SharedLib),
        "exe" => Some(ArtifactKind::Binary),
        _ => None,
    }
}

/// Package subdirectory a classified build artifact is copied into
///
/// Windows-style shared runtime files (`.dll`) land next to executables in
/// `bin/`; every other library lands in `lib/`.
pub fn artifact_dest(kind: ArtifactKind, file_name: &str) -> &'static str {
    match kind {
        ArtifactKind::Header => "include",
        ArtifactKind::StaticLib => "lib",
        ArtifactKind::SharedLib => {
            if file_name.ends_with(".dll") {
                "bin"
            } else {
                "lib"
            }
        }
        ArtifactKind::Binary => "bin",
    }
}

/// Canonical package output layout
#[derive(Debug, Clone)]
pub struct PackageLayout {
    /// Package root directory
    pub root: PathBuf,
}

impl PackageLayout {
    /// Layout rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Public header directory
    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    /// Library directory
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Binary directory
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// License directory
    pub fn licenses_dir(&self) -> PathBuf {
        self.root.join(defaults::LICENSES_DIR)
    }
}

/// Files placed into the package layout
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PackagingReport {
    /// Header file names copied into include/
    pub headers: Vec<String>,
    /// Library file names copied into lib/
    pub libs: Vec<String>,
    /// Binary and runtime file names copied into bin/
    pub bins: Vec<String>,
}

/// Copy produced artifacts into the package layout
///
/// For `HeaderOnly` only the recipe's public headers are copied; `lib/` and
/// `bin/` are created empty. For `Compiled` the build working directory is
/// walked and every recognized library or binary is copied exactly once.
pub fn package_artifacts(
    recipe: &Recipe,
    mode: BuildMode,
    source_root: &Path,
    build_dir: &Path,
    layout: &PackageLayout,
) -> Result<PackagingReport, ForgeError> {
    filesystem::create_dir_all(&layout.include_dir())?;
    filesystem::create_dir_all(&layout.lib_dir())?;
    filesystem::create_dir_all(&layout.bin_dir())?;

    let mut report = PackagingReport::default();

    for header in &recipe.build.headers {
        let from = source_root.join(header);
        let file_name = from
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(header.as_str())
            .to_string();
        filesystem::copy_file(&from, &layout.include_dir().join(&file_name))?;
        report.headers.push(file_name);
    }

    if mode == BuildMode::Compiled {
        // Sorted walk plus name-keyed map keeps the copy set deterministic
        let mut matches: BTreeMap<String, (PathBuf, &'static str)> = BTreeMap::new();
        for entry in WalkDir::new(build_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| FilesystemError::ReadFile {
                path: build_dir.to_path_buf(),
                error: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(kind) = classify(file_name) else {
                continue;
            };
            if kind == ArtifactKind::Header {
                continue;
            }
            let dest = artifact_dest(kind, file_name);
            matches
                .entry(file_name.to_string())
                .or_insert((entry.path().to_path_buf(), dest));
        }

        for (file_name, (from, dest)) in matches {
            filesystem::copy_file(&from, &layout.root.join(dest).join(&file_name))?;
            if dest == "lib" {
                report.libs.push(file_name);
            } else {
                report.bins.push(file_name);
            }
        }
    }

    Ok(report)
}

/// Extract the license text and write it into the package layout
pub fn package_license(
    recipe: &Recipe,
    source_root: &Path,
    layout: &PackageLayout,
) -> Result<(), ForgeError> {
    let text = license::extract_license(source_root, recipe.source.primary_header.as_deref())?;
    let dest = layout.licenses_dir().join(defaults::LICENSE_FILE);
    filesystem::write_file(&dest, &text)?;
    Ok(())
}
