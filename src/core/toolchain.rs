//! Toolchain description and validation
//!
//! Describes the native build toolchain (CMake program, generator, language
//! standard, target platform) and validates resolved options against it.
//! Invocation lives in [`crate::infra::cmake`].

use std::path::PathBuf;

use crate::core::options::ResolvedOptions;
use crate::core::recipe::Recipe;
use crate::error::OptionError;

/// Target platform, driving artifact classification conventions and
/// system library selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPlatform {
    Linux,
    FreeBsd,
    MacOs,
    Windows,
}

impl TargetPlatform {
    /// Platform of the host pkgforge runs on
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "freebsd") {
            Self::FreeBsd
        } else {
            Self::Linux
        }
    }

    /// Platforms where enabled options pull in explicit system libraries
    /// (e.g. pthread)
    pub fn links_explicit_system_libs(self) -> bool {
        matches!(self, Self::Linux | Self::FreeBsd)
    }
}

/// Native build toolchain description
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// CMake program to invoke
    pub cmake: PathBuf,
    /// CMake generator (None uses the cmake default)
    pub generator: Option<String>,
    /// Configured C++ standard (None leaves the project default in place)
    pub cpp_std: Option<u32>,
    /// Target platform
    pub platform: TargetPlatform,
    /// Parallel build jobs
    pub jobs: usize,
}

impl Toolchain {
    /// Toolchain for the host platform with default settings
    pub fn host() -> Self {
        Self {
            cmake: PathBuf::from("cmake"),
            generator: None,
            cpp_std: None,
            platform: TargetPlatform::host(),
            jobs: num_cpus::get(),
        }
    }

    /// Set the CMake program
    #[must_use]
    pub fn with_cmake(mut self, cmake: PathBuf) -> Self {
        self.cmake = cmake;
        self
    }

    /// Set the configured C++ standard
    #[must_use]
    pub fn with_cpp_std(mut self, std: u32) -> Self {
        self.cpp_std = Some(std);
        self
    }

    /// Set the number of parallel build jobs
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }
}

/// Validate resolved options against the toolchain
///
/// An enabled option declaring `min_std` fails with `UnsupportedToolchain`
/// when the toolchain explicitly configures a C++ standard below it. When
/// no standard is configured the check does not trigger.
pub fn validate_toolchain(
    recipe: &Recipe,
    options: &ResolvedOptions,
    toolchain: &Toolchain,
) -> Result<(), OptionError> {
    let Some(configured) = toolchain.cpp_std else {
        return Ok(());
    };

    for (name, definition) in &recipe.options {
        let Some(required) = definition.min_std else {
            continue;
        };
        let enabled = options.get(name).is_some_and(super::options::OptionValue::is_enabled);
        if enabled && configured < required {
            return Err(OptionError::UnsupportedToolchain {
                option: name.clone(),
                required,
                configured,
            });
        }
    }

    Ok(())
}
