//! Build pipeline orchestration
//!
//! Runs the full package build: option resolution, toolchain validation,
//! requirement selection and resolution, source acquisition, build mode
//! selection, the native build (compiled sources only), artifact packaging,
//! license extraction, and metadata emission. Each stage either succeeds or
//! aborts the run with its domain error; nothing is retried.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::build_mode::{BuildMode, BuildModeSelector};
use crate::core::deps::{select_requirements, DependencyRequirement};
use crate::core::metadata::PackageMetadata;
use crate::core::options::{OptionValue, ResolvedOptions};
use crate::core::packaging::{package_artifacts, package_license, PackageLayout, PackagingReport};
use crate::core::recipe::Recipe;
use crate::core::toolchain::{validate_toolchain, Toolchain};
use crate::error::{BuildError, ForgeError};
use crate::infra::cmake::{build_dir_for, CmakeInvoker};
use crate::infra::filesystem;
use crate::infra::source;
use crate::registry::{resolve_all, DependencyResolver, ResolvedDependency};

/// Workspace directory layout for one project
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    /// Downloaded archives
    pub downloads: PathBuf,
    /// Extracted source trees
    pub sources: PathBuf,
    /// Per-configuration build working directories
    pub builds: PathBuf,
    /// Packaged output
    pub package: PathBuf,
}

impl WorkspacePaths {
    /// Standard layout under a project root
    pub fn for_project(root: &Path) -> Self {
        Self {
            downloads: root.join(defaults::DOWNLOADS_DIR),
            sources: root.join(defaults::SOURCES_DIR),
            builds: root.join(defaults::BUILD_DIR),
            package: root.join(defaults::PACKAGE_DIR),
        }
    }
}

/// Result of a completed pipeline run
#[derive(Debug)]
pub struct BuildReport {
    /// Selected build mode
    pub mode: BuildMode,
    /// Requirements selected for this configuration
    pub requirements: Vec<DependencyRequirement>,
    /// Emitted consumption metadata
    pub metadata: PackageMetadata,
    /// Root of the packaged output
    pub package_dir: PathBuf,
    /// Files placed into the package layout
    pub artifacts: PackagingReport,
    /// Whether the archive download was skipped (cache hit)
    pub download_skipped: bool,
}

/// Build pipeline for one recipe and configuration
pub struct BuildPipeline<'a> {
    recipe: &'a Recipe,
    toolchain: &'a Toolchain,
    resolver: &'a dyn DependencyResolver,
    paths: WorkspacePaths,
    /// Discard an interrupted build directory instead of failing on it
    pub force_clean: bool,
    /// Re-download and re-extract even on a cache hit
    pub force_fetch: bool,
}

impl<'a> BuildPipeline<'a> {
    /// Create a pipeline over the given workspace
    pub fn new(
        recipe: &'a Recipe,
        toolchain: &'a Toolchain,
        resolver: &'a dyn DependencyResolver,
        paths: WorkspacePaths,
    ) -> Self {
        Self {
            recipe,
            toolchain,
            resolver,
            paths,
            force_clean: false,
            force_fetch: false,
        }
    }

    /// Run the pipeline end to end
    pub async fn run(
        &self,
        overrides: &BTreeMap<String, OptionValue>,
    ) -> Result<BuildReport, ForgeError> {
        // Configuration errors surface before any filesystem or network work
        let options = ResolvedOptions::resolve(self.recipe, overrides)?;
        validate_toolchain(self.recipe, &options, self.toolchain)?;

        let requirements = select_requirements(self.recipe, &options)?;
        let dependencies = resolve_all(self.resolver, &requirements)?;
        for dep in &dependencies {
            tracing::info!("Resolved {} {}", dep.package, dep.version);
        }

        let acquired = source::acquire(
            self.recipe,
            &self.paths.downloads,
            &self.paths.sources,
            self.force_fetch,
            None,
        )
        .await?;

        let selector = BuildModeSelector::new();
        let mode = selector.determine(
            &acquired.root,
            self.recipe.source.build_indicator.as_deref(),
        )?;
        tracing::info!("Build mode: {mode:?}");

        let build_dir = build_dir_for(
            &self.paths.builds,
            &self.recipe.package.name,
            &options.config_hash(),
        );
        if mode == BuildMode::Compiled {
            self.run_native_build(&options, &dependencies, &acquired.root, &build_dir)?;
        }

        let layout = PackageLayout::new(self.paths.package.clone());
        let artifacts = package_artifacts(self.recipe, mode, &acquired.root, &build_dir, &layout)?;
        package_license(self.recipe, &acquired.root, &layout)?;

        let metadata = PackageMetadata::emit(self.recipe, &options, mode, self.toolchain.platform);
        metadata.save(&layout.root.join(defaults::METADATA_FILE))?;

        Ok(BuildReport {
            mode,
            requirements,
            metadata,
            package_dir: layout.root,
            artifacts,
            download_skipped: acquired.download_skipped,
        })
    }

    /// Drive the toolchain phases inside a stamped build directory
    ///
    /// The stamp file marks an in-progress build. Finding one from a
    /// previous run means that run was interrupted and its directory
    /// contents are untrustworthy; the pipeline refuses to reuse them
    /// unless `force_clean` discards the directory first.
    fn run_native_build(
        &self,
        options: &ResolvedOptions,
        dependencies: &[ResolvedDependency],
        source_root: &Path,
        build_dir: &Path,
    ) -> Result<(), ForgeError> {
        let stamp = build_dir.join(defaults::BUILD_STAMP);
        if stamp.exists() {
            if !self.force_clean {
                return Err(BuildError::IncompleteBuildState {
                    build_dir: build_dir.to_path_buf(),
                }
                .into());
            }
            tracing::warn!("Discarding interrupted build in {}", build_dir.display());
            filesystem::remove_dir_all(build_dir)?;
        }

        filesystem::create_dir_all(build_dir)?;
        filesystem::write_file(&stamp, "")?;

        // A surfaced toolchain failure is not an interruption: clear the
        // stamp so a rerun reports the failure itself rather than
        // IncompleteBuildState
        let phases = self.drive_toolchain(options, dependencies, source_root, build_dir);
        if phases.is_err() {
            let _ = std::fs::remove_file(&stamp);
            return phases;
        }

        std::fs::remove_file(&stamp)?;
        Ok(())
    }

    fn drive_toolchain(
        &self,
        options: &ResolvedOptions,
        dependencies: &[ResolvedDependency],
        source_root: &Path,
        build_dir: &Path,
    ) -> Result<(), ForgeError> {
        let invoker = CmakeInvoker::new(self.toolchain);
        invoker.generate(self.recipe, options, dependencies, build_dir)?;
        invoker.configure(&self.recipe.package.name, source_root, build_dir)?;
        invoker.build(&self.recipe.package.name, build_dir)?;
        Ok(())
    }
}
