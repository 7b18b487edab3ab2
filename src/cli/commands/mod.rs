//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod clean;
pub mod deps;
pub mod fetch;
pub mod info;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and package the recipe
    Build {
        /// Project directory containing pkgforge.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Override an option (repeatable, e.g. -o with_z=zlib)
        #[arg(short, long = "option", value_name = "NAME=VALUE")]
        options: Vec<String>,

        /// Number of parallel build jobs
        #[arg(short, long)]
        jobs: Option<usize>,

        /// CMake program to invoke
        #[arg(long)]
        cmake: Option<PathBuf>,

        /// C++ standard configured for the build (e.g. 11, 17)
        #[arg(long)]
        cpp_std: Option<u32>,

        /// Root directory of the local package registry
        #[arg(long)]
        packages_root: Option<PathBuf>,

        /// Discard an interrupted build directory instead of failing
        #[arg(long)]
        force_clean: bool,

        /// Re-download and re-extract the source even on a cache hit
        #[arg(short, long)]
        force: bool,
    },

    /// Download and extract the recipe's source
    Fetch {
        /// Project directory containing pkgforge.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Force re-download even if files exist
        #[arg(short, long)]
        force: bool,
    },

    /// Show the dependency requirements for a configuration
    Deps {
        /// Project directory containing pkgforge.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Override an option (repeatable, e.g. -o with_z=zlib)
        #[arg(short, long = "option", value_name = "NAME=VALUE")]
        options: Vec<String>,
    },

    /// Show recipe information
    Info {
        /// Project directory containing pkgforge.toml
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Remove build artifacts
    Clean {
        /// Project directory containing pkgforge.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Also remove downloads and extracted sources
        #[arg(long)]
        all: bool,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Build {
                path,
                options,
                jobs,
                cmake,
                cpp_std,
                packages_root,
                force_clean,
                force,
            } => {
                let build_options = build::BuildOptions {
                    options,
                    jobs,
                    cmake,
                    cpp_std,
                    packages_root,
                    force_clean,
                    force,
                };
                build::execute(&path, build_options).await
            }
            Self::Fetch { path, force } => fetch::execute(&path, force).await,
            Self::Deps { path, options } => deps::execute(&path, &options).await,
            Self::Info { path } => info::execute(&path).await,
            Self::Clean { path, all } => clean::execute(&path, all).await,
        }
    }
}
