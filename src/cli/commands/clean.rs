//! CLI implementation for `pkgforge clean` command
//!
//! This module handles the CLI interface for cleaning build artifacts.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::build::load_recipe;
use crate::cli::output::status;
use crate::core::clean::{clean_workspace, has_artifacts};

/// Execute the clean command
pub async fn execute(path: &Path, all: bool) -> Result<()> {
    // Validate the recipe so a typo'd path never gets cleaned
    let _recipe = load_recipe(path)?;

    if !all && !has_artifacts(path) {
        println!("{} Nothing to clean", status::INFO);
        return Ok(());
    }

    let result =
        clean_workspace(path, all).with_context(|| "Failed to clean build artifacts")?;

    if result.removed.is_empty() {
        println!("{} Nothing to clean", status::INFO);
    } else {
        println!("{} Cleaned build artifacts:", status::SUCCESS);
        for dir in &result.removed {
            println!("  Removed {dir}/");
        }
    }

    Ok(())
}
