//! Package registry and dependency resolution
//!
//! The orchestrator only declares requirements; locating them is the job of
//! an external resolver behind the [`DependencyResolver`] trait. The
//! built-in [`LocalRegistry`] resolves against a directory of already
//! packaged libraries laid out as `<root>/<package>/<version>/`.

use semver::Version;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::deps::DependencyRequirement;
use crate::core::metadata::PackageMetadata;
use crate::error::DependencyError;

/// Resolved include/link information for one upstream package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    /// Package name
    pub package: String,
    /// Resolved version
    pub version: Version,
    /// Include directories
    pub include_dirs: Vec<PathBuf>,
    /// Library directories
    pub lib_dirs: Vec<PathBuf>,
    /// Libraries to link
    pub libs: Vec<String>,
}

/// External collaborator that locates declared requirements
pub trait DependencyResolver {
    /// Resolve a requirement to include/link paths
    fn resolve(
        &self,
        requirement: &DependencyRequirement,
    ) -> Result<ResolvedDependency, DependencyError>;
}

/// Resolve every requirement, failing fast on the first unresolved one
pub fn resolve_all(
    resolver: &dyn DependencyResolver,
    requirements: &[DependencyRequirement],
) -> Result<Vec<ResolvedDependency>, DependencyError> {
    requirements
        .iter()
        .map(|req| resolver.resolve(req))
        .collect()
}

/// Directory-backed registry of packaged libraries
///
/// Layout: `<root>/<package>/<version>/{include,lib,bin,pkgforge-metadata.json}`.
/// The highest version satisfying the constraint wins.
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    root: PathBuf,
}

impl LocalRegistry {
    /// Create a registry rooted at the given packages directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Registry root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn available_versions(&self, package: &str) -> Vec<Version> {
        let package_dir = self.root.join(package);
        let Ok(entries) = std::fs::read_dir(&package_dir) else {
            return Vec::new();
        };

        let mut versions: Vec<Version> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| Version::parse(&entry.file_name().to_string_lossy()).ok())
            .collect();
        versions.sort();
        versions
    }
}

impl DependencyResolver for LocalRegistry {
    fn resolve(
        &self,
        requirement: &DependencyRequirement,
    ) -> Result<ResolvedDependency, DependencyError> {
        let unresolved = || DependencyError::UnresolvedDependency {
            package: requirement.package.clone(),
            constraint: requirement.constraint.to_string(),
        };

        let version = self
            .available_versions(&requirement.package)
            .into_iter()
            .rev()
            .find(|v| requirement.constraint.matches(v))
            .ok_or_else(unresolved)?;

        let package_root = self.root.join(&requirement.package).join(version.to_string());

        // Library names come from the package's own consumption metadata
        // when present; otherwise the package name is assumed
        let libs = PackageMetadata::load(&package_root.join(defaults::METADATA_FILE))
            .map(|metadata| metadata.libs)
            .unwrap_or_else(|_| vec![requirement.package.clone()]);

        Ok(ResolvedDependency {
            package: requirement.package.clone(),
            version,
            include_dirs: vec![package_root.join("include")],
            lib_dirs: vec![package_root.join("lib")],
            libs,
        })
    }
}
