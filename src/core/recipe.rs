//! Recipe (package spec) handling
//!
//! Parses declarative TOML recipes describing a native library package:
//! metadata, source location, typed build options, conditional dependency
//! requirements, and build configuration. A recipe is immutable after load.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::RecipeError;

/// Complete package recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageInfo,

    /// Source configuration
    pub source: SourceSpec,

    /// Declared build options (sorted by name for deterministic iteration)
    #[serde(default)]
    pub options: BTreeMap<String, OptionDefinition>,

    /// Conditional dependency requirement rules, in declaration order
    #[serde(default)]
    pub requirements: Vec<RequirementRule>,

    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,
}

/// Package metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageInfo {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Package description
    #[serde(default)]
    pub description: String,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// Search topics
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Source configuration - exactly ONE of `url` or `path` must be specified
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSpec {
    /// Source archive URL
    #[serde(default)]
    pub url: Option<String>,

    /// SHA256 checksum of the source archive (required with `url`)
    #[serde(default)]
    pub sha256: Option<String>,

    /// Local path to an already extracted source tree
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Strip the archive's top-level directory during extraction
    #[serde(default = "default_true")]
    pub strip_root: bool,

    /// File whose presence marks the source tree as requiring compilation
    #[serde(default)]
    pub build_indicator: Option<String>,

    /// Primary public header, used for the license extraction fallback
    #[serde(default)]
    pub primary_header: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Typed option declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionDefinition {
    /// Value domain with default
    #[serde(flatten)]
    pub domain: OptionDomain,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Compile-time define emitted for this option (always, regardless of
    /// build mode)
    #[serde(default)]
    pub define: Option<String>,

    /// For choice options: the value that sets the define to 1
    #[serde(default)]
    pub define_when: Option<String>,

    /// CMake cache variable toggled by this option
    #[serde(default)]
    pub cmake_var: Option<String>,

    /// Minimum C++ standard required when this option is enabled
    #[serde(default)]
    pub min_std: Option<u32>,

    /// System libraries pulled in on POSIX-like targets when enabled
    #[serde(default)]
    pub system_libs: Vec<String>,
}

/// Option value domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionDomain {
    /// Boolean toggle
    Bool {
        /// Default value
        default: bool,
    },

    /// Enumerated choice
    Choice {
        /// Allowed values
        choices: Vec<String>,
        /// Default value (must be one of `choices`)
        default: String,
    },
}

/// Conditional dependency requirement rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementRule {
    /// Upstream package name
    pub package: String,

    /// Semver version constraint (e.g. `"=3.0.2"` or `">=1.2.11, <2"`)
    pub version: String,

    /// Option values that must all match for this rule to apply;
    /// an empty map selects the requirement unconditionally
    #[serde(default)]
    pub when: BTreeMap<String, crate::core::options::OptionValue>,
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BuildConfig {
    /// Public headers copied into the package include directory
    #[serde(default)]
    pub headers: Vec<String>,

    /// Library names produced by a compiled build
    #[serde(default)]
    pub libs: Vec<String>,

    /// Extra CMake cache variables set unconditionally
    #[serde(default)]
    pub cmake_vars: BTreeMap<String, String>,
}

impl Recipe {
    /// Load a recipe from a TOML file
    pub fn load(path: &Path) -> Result<Self, RecipeError> {
        if !path.exists() {
            return Err(RecipeError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| RecipeError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse a recipe from TOML content and validate its source declaration
    pub fn from_toml(content: &str) -> Result<Self, RecipeError> {
        let recipe: Self = toml::from_str(content)?;
        recipe.validate_source()?;
        Ok(recipe)
    }

    /// Check that exactly one source type is declared and that url sources
    /// carry a checksum
    fn validate_source(&self) -> Result<(), RecipeError> {
        match (&self.source.url, &self.source.path) {
            (None, None) => Err(RecipeError::NoSourceType {
                package: self.package.name.clone(),
            }),
            (Some(_), Some(_)) => Err(RecipeError::MultipleSourceTypes {
                package: self.package.name.clone(),
            }),
            (Some(_), None) if self.source.sha256.is_none() => {
                Err(RecipeError::UrlWithoutChecksum {
                    package: self.package.name.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}
