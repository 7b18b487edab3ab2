//! Consumption metadata emission
//!
//! Builds the read-only metadata downstream build graphs consume: compile
//! defines (always emitted, one per option declaring a define), library
//! names (empty for header-only packages), package directories, and
//! platform-conditional system libraries.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::build_mode::BuildMode;
use crate::core::options::ResolvedOptions;
use crate::core::recipe::Recipe;
use crate::core::toolchain::TargetPlatform;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Consumption metadata for a packaged library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Package name
    pub package: String,
    /// Package version
    pub version: String,
    /// Compile-time defines (`NAME=1`/`NAME=0`), sorted by option name
    pub defines: Vec<String>,
    /// Library names to link (empty when header-only)
    pub libs: Vec<String>,
    /// Include directories relative to the package root
    pub include_dirs: Vec<String>,
    /// Library directories relative to the package root
    pub lib_dirs: Vec<String>,
    /// Binary directories relative to the package root
    pub bin_dirs: Vec<String>,
    /// System libraries required on the target platform
    pub system_libs: Vec<String>,
}

impl PackageMetadata {
    /// Compute the metadata for a finished build
    pub fn emit(
        recipe: &Recipe,
        options: &ResolvedOptions,
        mode: BuildMode,
        platform: TargetPlatform,
    ) -> Self {
        // Defines reflect every declaring option, regardless of build mode
        let defines = recipe
            .options
            .iter()
            .filter_map(|(name, definition)| {
                options
                    .get(name)
                    .and_then(|value| definition.define_flag(value))
            })
            .collect();

        let (libs, lib_dirs, bin_dirs) = match mode {
            BuildMode::HeaderOnly => (Vec::new(), Vec::new(), Vec::new()),
            BuildMode::Compiled => (
                recipe.build.libs.clone(),
                vec!["lib".to_string()],
                vec!["bin".to_string()],
            ),
        };

        let mut system_libs: Vec<String> = Vec::new();
        if platform.links_explicit_system_libs() {
            for (name, definition) in &recipe.options {
                let enabled = options
                    .get(name)
                    .is_some_and(crate::core::options::OptionValue::is_enabled);
                if enabled {
                    for lib in &definition.system_libs {
                        if !system_libs.contains(lib) {
                            system_libs.push(lib.clone());
                        }
                    }
                }
            }
        }

        Self {
            package: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            defines,
            libs,
            include_dirs: vec!["include".to_string()],
            lib_dirs,
            bin_dirs,
            system_libs,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write the metadata file into the package directory
    pub fn save(&self, path: &Path) -> Result<(), FilesystemError> {
        filesystem::write_file(path, &self.to_json())
    }

    /// Load a metadata file
    pub fn load(path: &Path) -> Result<Self, FilesystemError> {
        let content = filesystem::read_file(path)?;
        serde_json::from_str(&content).map_err(|e| FilesystemError::ReadFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionValue;
    use std::collections::BTreeMap;

    fn recipe() -> Recipe {
        Recipe::from_toml(
            r#"
            [package]
            name = "tinyexr"
            version = "1.0.8"

            [source]
            path = "/tmp/tinyexr"

            [options.with_z]
            type = "choice"
            choices = ["zlib", "miniz"]
            default = "miniz"
            define = "TINYEXR_USE_MINIZ"
            define_when = "miniz"

            [options.with_piz]
            type = "bool"
            default = true
            define = "TINYEXR_USE_PIZ"

            [options.with_zfp]
            type = "bool"
            default = false
            define = "TINYEXR_USE_ZFP"

            [options.with_thread]
            type = "bool"
            default = false
            define = "TINYEXR_USE_THREAD"
            system_libs = ["pthread"]

            [options.with_openmp]
            type = "bool"
            default = false
            define = "TINYEXR_USE_OPENMP"

            [build]
            libs = ["tinyexr"]
            "#,
        )
        .unwrap()
    }

    fn resolve(overrides: &[(&str, OptionValue)]) -> ResolvedOptions {
        let map: BTreeMap<String, OptionValue> = overrides
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        ResolvedOptions::resolve(&recipe(), &map).unwrap()
    }

    #[test]
    fn test_all_defines_emitted_for_header_only() {
        let metadata = PackageMetadata::emit(
            &recipe(),
            &resolve(&[]),
            BuildMode::HeaderOnly,
            TargetPlatform::Linux,
        );

        assert_eq!(metadata.defines.len(), 5);
        assert!(metadata.defines.contains(&"TINYEXR_USE_MINIZ=1".to_string()));
        assert!(metadata.defines.contains(&"TINYEXR_USE_PIZ=1".to_string()));
        assert!(metadata.defines.contains(&"TINYEXR_USE_ZFP=0".to_string()));
        assert!(metadata.defines.contains(&"TINYEXR_USE_THREAD=0".to_string()));
        assert!(metadata.defines.contains(&"TINYEXR_USE_OPENMP=0".to_string()));
    }

    #[test]
    fn test_header_only_has_no_libs_or_lib_dirs() {
        let metadata = PackageMetadata::emit(
            &recipe(),
            &resolve(&[]),
            BuildMode::HeaderOnly,
            TargetPlatform::Linux,
        );

        assert!(metadata.libs.is_empty());
        assert!(metadata.lib_dirs.is_empty());
        assert!(metadata.bin_dirs.is_empty());
        assert_eq!(metadata.include_dirs, vec!["include"]);
    }

    #[test]
    fn test_compiled_exposes_library() {
        let metadata = PackageMetadata::emit(
            &recipe(),
            &resolve(&[]),
            BuildMode::Compiled,
            TargetPlatform::Linux,
        );

        assert_eq!(metadata.libs, vec!["tinyexr"]);
        assert_eq!(metadata.lib_dirs, vec!["lib"]);
        assert_eq!(metadata.bin_dirs, vec!["bin"]);
    }

    #[test]
    fn test_pthread_added_on_posix_when_threading_enabled() {
        let options = resolve(&[("with_thread", OptionValue::Bool(true))]);

        let linux =
            PackageMetadata::emit(&recipe(), &options, BuildMode::Compiled, TargetPlatform::Linux);
        assert_eq!(linux.system_libs, vec!["pthread"]);

        let freebsd = PackageMetadata::emit(
            &recipe(),
            &options,
            BuildMode::Compiled,
            TargetPlatform::FreeBsd,
        );
        assert_eq!(freebsd.system_libs, vec!["pthread"]);
    }

    #[test]
    fn test_no_system_libs_on_windows_or_when_disabled() {
        let enabled = resolve(&[("with_thread", OptionValue::Bool(true))]);
        let windows = PackageMetadata::emit(
            &recipe(),
            &enabled,
            BuildMode::Compiled,
            TargetPlatform::Windows,
        );
        assert!(windows.system_libs.is_empty());

        let disabled = resolve(&[]);
        let linux = PackageMetadata::emit(
            &recipe(),
            &disabled,
            BuildMode::Compiled,
            TargetPlatform::Linux,
        );
        assert!(linux.system_libs.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let metadata = PackageMetadata::emit(
            &recipe(),
            &resolve(&[]),
            BuildMode::Compiled,
            TargetPlatform::Linux,
        );

        let parsed: PackageMetadata = serde_json::from_str(&metadata.to_json()).unwrap();
        assert_eq!(parsed, metadata);
    }
}
