//! CLI implementation for `pkgforge deps` command
//!
//! Shows the dependency requirements selected for a configuration without
//! building anything.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::build::{load_recipe, parse_overrides};
use crate::cli::output::{status, OutputConfig};
use crate::core::deps::select_requirements;
use crate::core::options::ResolvedOptions;

/// Execute the deps command
pub async fn execute(path: &Path, raw_overrides: &[String]) -> Result<()> {
    let recipe = load_recipe(path)?;
    let overrides = parse_overrides(raw_overrides)?;

    let options = ResolvedOptions::resolve(&recipe, &overrides)
        .with_context(|| "Failed to resolve options")?;
    let requirements = select_requirements(&recipe, &options)
        .with_context(|| "Failed to select requirements")?;

    if OutputConfig::global().json {
        let entries: Vec<serde_json::Value> = requirements
            .iter()
            .map(|req| {
                serde_json::json!({
                    "package": req.package,
                    "constraint": req.constraint.to_string(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if requirements.is_empty() {
        println!(
            "{} {} has no requirements for this configuration",
            status::SUCCESS,
            recipe.package.name
        );
    } else {
        println!(
            "{} {} requires {} package(s):",
            status::SUCCESS,
            recipe.package.name,
            requirements.len()
        );
        for req in &requirements {
            println!("    {req}");
        }
    }

    Ok(())
}
