//! CLI implementation for `pkgforge info` command
//!
//! Shows recipe metadata, declared options with their defaults, and the
//! requirement table.

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::build::load_recipe;
use crate::cli::output::OutputConfig;
use crate::core::recipe::OptionDomain;

/// Execute the info command
pub async fn execute(path: &Path) -> Result<()> {
    let recipe = load_recipe(path)?;

    if OutputConfig::global().json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    println!("{} v{}", recipe.package.name, recipe.package.version);
    if !recipe.package.description.is_empty() {
        println!("  {}", recipe.package.description);
    }
    if let Some(ref license) = recipe.package.license {
        println!("  License: {license}");
    }
    if let Some(ref homepage) = recipe.package.homepage {
        println!("  Homepage: {homepage}");
    }

    if let Some(ref url) = recipe.source.url {
        println!("  Source: {url}");
    } else if let Some(ref local) = recipe.source.path {
        println!("  Source: {}", local.display());
    }

    if !recipe.options.is_empty() {
        println!("  Options:");
        for (name, definition) in &recipe.options {
            match &definition.domain {
                OptionDomain::Bool { default } => {
                    println!("    {name}: bool (default {default})");
                }
                OptionDomain::Choice { choices, default } => {
                    println!(
                        "    {name}: one of [{}] (default {default})",
                        choices.join(", ")
                    );
                }
            }
        }
    }

    if !recipe.requirements.is_empty() {
        println!("  Requirement rules:");
        for rule in &recipe.requirements {
            if rule.when.is_empty() {
                println!("    {} {}", rule.package, rule.version);
            } else {
                let conditions: Vec<String> = rule
                    .when
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                println!(
                    "    {} {} when {}",
                    rule.package,
                    rule.version,
                    conditions.join(", ")
                );
            }
        }
    }

    Ok(())
}
