//! Native build toolchain invocation
//!
//! Translates resolved options into CMake configuration and drives the
//! native build in two phases: generate/configure (cache preload scripts +
//! build-system files) and build (artifacts). All writes go into the
//! isolated build working directory, never the source tree, so a shared
//! source checkout stays clean across configurations.
//!
//! Each phase is one blocking child process with one exit status; a
//! non-zero status is fatal and never retried, since the build is
//! deterministic for identical inputs.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::defaults;
use crate::core::options::ResolvedOptions;
use crate::core::recipe::Recipe;
use crate::core::toolchain::Toolchain;
use crate::error::{BuildError, FilesystemError};
use crate::infra::filesystem;
use crate::registry::ResolvedDependency;

/// Cache preload script carrying option toggles
pub const TOOLCHAIN_SCRIPT: &str = "toolchain.cmake";

/// Cache preload script carrying resolved dependency search paths
pub const DEPS_SCRIPT: &str = "deps.cmake";

/// Dependency directory commands, pulled into the project scope via
/// `CMAKE_PROJECT_INCLUDE`
pub const DEPS_LINK_SCRIPT: &str = "deps-link.cmake";

/// CMake invocation for one build configuration
#[derive(Debug)]
pub struct CmakeInvoker<'a> {
    toolchain: &'a Toolchain,
}

impl<'a> CmakeInvoker<'a> {
    /// Create an invoker for the given toolchain
    pub fn new(toolchain: &'a Toolchain) -> Self {
        Self { toolchain }
    }

    /// Generate phase: write the cache preload scripts into the build dir
    ///
    /// A `-C` preload script may only set cache entries, so dependency
    /// directory commands go into a separate script that cmake includes at
    /// `project()` time through the `CMAKE_PROJECT_INCLUDE` cache variable.
    pub fn generate(
        &self,
        recipe: &Recipe,
        options: &ResolvedOptions,
        dependencies: &[ResolvedDependency],
        build_dir: &Path,
    ) -> Result<(), FilesystemError> {
        filesystem::write_file(
            &build_dir.join(TOOLCHAIN_SCRIPT),
            &self.toolchain_script(recipe, options),
        )?;
        let link_script = build_dir.join(DEPS_LINK_SCRIPT);
        filesystem::write_file(&link_script, &deps_link_script(dependencies))?;
        filesystem::write_file(
            &build_dir.join(DEPS_SCRIPT),
            &deps_cache_script(dependencies, &link_script),
        )?;
        Ok(())
    }

    /// Configure phase: run cmake against the source tree
    pub fn configure(
        &self,
        package: &str,
        source_root: &Path,
        build_dir: &Path,
    ) -> Result<(), BuildError> {
        let mut command = Command::new(&self.toolchain.cmake);
        command
            .arg("-S")
            .arg(source_root)
            .arg("-B")
            .arg(build_dir)
            .arg("-C")
            .arg(build_dir.join(TOOLCHAIN_SCRIPT))
            .arg("-C")
            .arg(build_dir.join(DEPS_SCRIPT));
        if let Some(ref generator) = self.toolchain.generator {
            command.arg("-G").arg(generator);
        }

        run_phase(command, package, "configure", &self.toolchain.cmake)
    }

    /// Build phase: run the native build, delegating any internal
    /// parallelism to the toolchain
    pub fn build(&self, package: &str, build_dir: &Path) -> Result<(), BuildError> {
        let mut command = Command::new(&self.toolchain.cmake);
        command
            .arg("--build")
            .arg(build_dir)
            .arg("--parallel")
            .arg(self.toolchain.jobs.to_string());

        run_phase(command, package, "build", &self.toolchain.cmake)
    }

    fn toolchain_script(&self, recipe: &Recipe, options: &ResolvedOptions) -> String {
        let mut lines = vec!["# Generated by pkgforge".to_string()];

        for (name, definition) in &recipe.options {
            if let Some((var, state)) = options
                .get(name)
                .and_then(|value| definition.cmake_toggle(value))
            {
                lines.push(format!("set({var} {state} CACHE BOOL \"\" FORCE)"));
            }
        }

        for (var, value) in &recipe.build.cmake_vars {
            lines.push(format!("set({var} \"{value}\" CACHE STRING \"\" FORCE)"));
        }

        if let Some(std) = self.toolchain.cpp_std {
            lines.push(format!("set(CMAKE_CXX_STANDARD {std} CACHE STRING \"\" FORCE)"));
        }

        lines.join("\n") + "\n"
    }
}

/// Render resolved dependency search paths as cache entries
///
/// `CMAKE_PROJECT_INCLUDE` points cmake at the link script so the directory
/// commands run inside the project scope; directory commands placed directly
/// in a `-C` preload script would be evaluated and discarded.
fn deps_cache_script(dependencies: &[ResolvedDependency], link_script: &Path) -> String {
    let mut lines = vec!["# Generated by pkgforge".to_string()];

    for dep in dependencies {
        lines.push(format!("# {} {}", dep.package, dep.version));
    }

    let include_paths = cmake_path_list(dependencies.iter().flat_map(|d| &d.include_dirs));
    if !include_paths.is_empty() {
        lines.push(format!(
            "set(CMAKE_INCLUDE_PATH \"{include_paths}\" CACHE STRING \"\" FORCE)"
        ));
    }
    let library_paths = cmake_path_list(dependencies.iter().flat_map(|d| &d.lib_dirs));
    if !library_paths.is_empty() {
        lines.push(format!(
            "set(CMAKE_LIBRARY_PATH \"{library_paths}\" CACHE STRING \"\" FORCE)"
        ));
    }
    lines.push(format!(
        "set(CMAKE_PROJECT_INCLUDE \"{}\" CACHE FILEPATH \"\" FORCE)",
        link_script.display()
    ));

    lines.join("\n") + "\n"
}

/// Render the dependency directory commands evaluated at `project()` time
fn deps_link_script(dependencies: &[ResolvedDependency]) -> String {
    let mut lines = vec!["# Generated by pkgforge".to_string()];

    for dep in dependencies {
        lines.push(format!("# {} {}", dep.package, dep.version));
        for dir in &dep.include_dirs {
            lines.push(format!("include_directories(\"{}\")", dir.display()));
        }
        for dir in &dep.lib_dirs {
            lines.push(format!("link_directories(\"{}\")", dir.display()));
        }
        for lib in &dep.libs {
            lines.push(format!("link_libraries({lib})"));
        }
    }

    lines.join("\n") + "\n"
}

/// Join paths into a semicolon-separated cmake list
fn cmake_path_list<'p>(paths: impl Iterator<Item = &'p PathBuf>) -> String {
    paths
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(";")
}

/// Run one toolchain phase and map a non-zero exit to `BuildFailure`
fn run_phase(
    mut command: Command,
    package: &str,
    phase: &str,
    program: &Path,
) -> Result<(), BuildError> {
    tracing::debug!("Running {phase} phase: {command:?}");

    let output = command.output().map_err(|_| BuildError::ToolchainNotFound {
        program: program.display().to_string(),
    })?;

    if !output.status.success() {
        return Err(BuildError::BuildFailure {
            package: package.to_string(),
            phase: phase.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            diagnostics: diagnostics_tail(&output.stderr, &output.stdout),
        });
    }

    Ok(())
}

/// Diagnostic text carried in a build failure: stderr when present,
/// stdout otherwise, capped to the most recent bytes
fn diagnostics_tail(stderr: &[u8], stdout: &[u8]) -> String {
    let raw = if stderr.is_empty() { stdout } else { stderr };
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.len() > defaults::DIAGNOSTIC_TAIL_BYTES {
        let start = text.len() - defaults::DIAGNOSTIC_TAIL_BYTES;
        // Keep the tail on a char boundary
        let start = (start..text.len())
            .find(|i| text.is_char_boundary(*i))
            .unwrap_or(start);
        text[start..].to_string()
    } else {
        text.to_string()
    }
}

/// Build working directory for one configuration
///
/// Distinct option sets get distinct directories so stale artifacts from a
/// previous configuration can never leak into the current build.
pub fn build_dir_for(build_root: &Path, package: &str, config_hash: &str) -> PathBuf {
    build_root.join(format!("{package}-{config_hash}"))
}
