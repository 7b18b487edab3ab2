//! CLI implementation for `pkgforge fetch` command
//!
//! This module handles the CLI interface for downloading and extracting
//! the recipe's source tree.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::build::load_recipe;
use crate::cli::output::{self, status};
use crate::config::defaults;
use crate::infra::download::ProgressCallback;
use crate::infra::source;

/// Execute the fetch command
pub async fn execute(path: &Path, force: bool) -> Result<()> {
    let recipe = load_recipe(path)?;

    let bar = output::create_download_bar(0);
    let progress: ProgressCallback = {
        let bar = bar.clone();
        Box::new(move |downloaded, total| {
            if total > 0 && bar.length() != Some(total) {
                bar.set_length(total);
            }
            bar.set_position(downloaded);
        })
    };
    let acquired = source::acquire(
        &recipe,
        &path.join(defaults::DOWNLOADS_DIR),
        &path.join(defaults::SOURCES_DIR),
        force,
        Some(progress),
    )
    .await;
    bar.finish_and_clear();

    let acquired =
        acquired.with_context(|| format!("Failed to fetch '{}'", recipe.package.name))?;

    if acquired.download_skipped {
        println!(
            "{} Source already present at {}",
            status::INFO,
            acquired.root.display()
        );
    } else {
        println!(
            "{} Fetched {} v{} to {}",
            status::SUCCESS,
            recipe.package.name,
            recipe.package.version,
            acquired.root.display()
        );
    }

    Ok(())
}
