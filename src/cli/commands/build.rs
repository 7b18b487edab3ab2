//! CLI implementation for `pkgforge build` command
//!
//! Loads the recipe, runs the full build pipeline, and reports the
//! packaged result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::output::{self, status, OutputConfig};
use crate::config::defaults;
use crate::core::options::OptionValue;
use crate::core::pipeline::{BuildPipeline, WorkspacePaths};
use crate::core::recipe::Recipe;
use crate::core::toolchain::Toolchain;
use crate::registry::LocalRegistry;

/// Options for the build command
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Raw `NAME=VALUE` option overrides
    pub options: Vec<String>,
    /// Parallel build jobs
    pub jobs: Option<usize>,
    /// CMake program
    pub cmake: Option<PathBuf>,
    /// Configured C++ standard
    pub cpp_std: Option<u32>,
    /// Local package registry root
    pub packages_root: Option<PathBuf>,
    /// Discard an interrupted build directory
    pub force_clean: bool,
    /// Re-download and re-extract the source
    pub force: bool,
}

/// Execute the build command
pub async fn execute(path: &Path, options: BuildOptions) -> Result<()> {
    let recipe = load_recipe(path)?;
    let overrides = parse_overrides(&options.options)?;

    let mut toolchain = Toolchain::host();
    if let Some(cmake) = options.cmake {
        toolchain = toolchain.with_cmake(cmake);
    }
    if let Some(std) = options.cpp_std {
        toolchain = toolchain.with_cpp_std(std);
    }
    if let Some(jobs) = options.jobs {
        toolchain = toolchain.with_jobs(jobs);
    }

    let registry_root = options
        .packages_root
        .unwrap_or_else(|| path.join("packages"));
    let registry = LocalRegistry::new(registry_root);

    let mut pipeline = BuildPipeline::new(
        &recipe,
        &toolchain,
        &registry,
        WorkspacePaths::for_project(path),
    );
    pipeline.force_clean = options.force_clean;
    pipeline.force_fetch = options.force;

    let spinner = output::create_spinner(&format!(
        "Building {} v{}",
        recipe.package.name, recipe.package.version
    ));
    let report = pipeline.run(&overrides).await;
    spinner.finish_and_clear();

    let report = report.with_context(|| format!("Failed to build '{}'", recipe.package.name))?;

    if OutputConfig::global().json {
        println!("{}", report.metadata.to_json());
        return Ok(());
    }

    println!(
        "{} Built {} v{} ({:?})",
        status::SUCCESS,
        recipe.package.name,
        recipe.package.version,
        report.mode
    );
    if !report.requirements.is_empty() {
        println!("  Requirements:");
        for req in &report.requirements {
            println!("    {req}");
        }
    }
    if !report.artifacts.headers.is_empty() {
        println!("  Headers: {}", report.artifacts.headers.join(", "));
    }
    if !report.artifacts.libs.is_empty() {
        println!("  Libraries: {}", report.artifacts.libs.join(", "));
    }
    if !report.artifacts.bins.is_empty() {
        println!("  Binaries: {}", report.artifacts.bins.join(", "));
    }
    println!("  Package: {}", report.package_dir.display());

    Ok(())
}

/// Load the project recipe, failing with a hint when none exists
pub fn load_recipe(path: &Path) -> Result<Recipe> {
    let recipe_path = path.join(defaults::DEFAULT_RECIPE_FILE);
    if !recipe_path.exists() {
        anyhow::bail!(
            "No {} found in {}",
            defaults::DEFAULT_RECIPE_FILE,
            path.display()
        );
    }
    Recipe::load(&recipe_path)
        .with_context(|| format!("Failed to load recipe from {}", recipe_path.display()))
}

/// Parse repeated `NAME=VALUE` overrides into option values
pub fn parse_overrides(raw: &[String]) -> Result<BTreeMap<String, OptionValue>> {
    let mut overrides = BTreeMap::new();
    for entry in raw {
        let Some((name, value)) = entry.split_once('=') else {
            anyhow::bail!("Invalid option override '{entry}': expected NAME=VALUE");
        };
        overrides.insert(name.to_string(), OptionValue::parse(value));
    }
    Ok(overrides)
}
