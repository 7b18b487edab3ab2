//! Option model
//!
//! Resolves declared recipe options against user overrides, applying defaults
//! for omissions and failing fast on values outside an option's domain.
//! Resolution is pure: no side effects beyond validation errors.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::defaults;
use crate::core::recipe::{OptionDefinition, OptionDomain, Recipe};
use crate::error::OptionError;

/// A concrete option value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean toggle value
    Bool(bool),
    /// Enumerated choice value
    Choice(String),
}

impl OptionValue {
    /// Parse a raw CLI value: `true`/`false` become booleans, everything
    /// else is a choice value
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            other => Self::Choice(other.to_string()),
        }
    }

    /// Whether this value counts as "enabled" for toolchain checks and
    /// system library selection
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Choice(s) => write!(f, "{s}"),
        }
    }
}

/// Validated option assignment for one build configuration
///
/// Stored in a BTreeMap so iteration order, the canonical form, and the
/// derived configuration hash are all deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ResolvedOptions {
    /// Resolve user overrides against the recipe's declared options
    ///
    /// Defaults fill in omitted options. Fails with `UnknownOption` for an
    /// override naming no declared option, `InvalidOptionValue` for a choice
    /// outside its domain, and `TypeMismatch` for a bool/choice mixup.
    pub fn resolve(
        recipe: &Recipe,
        overrides: &BTreeMap<String, OptionValue>,
    ) -> Result<Self, OptionError> {
        for name in overrides.keys() {
            if !recipe.options.contains_key(name) {
                return Err(OptionError::UnknownOption { name: name.clone() });
            }
        }

        let mut values = BTreeMap::new();
        for (name, definition) in &recipe.options {
            let value = match overrides.get(name) {
                Some(value) => {
                    validate_value(name, definition, value)?;
                    value.clone()
                }
                None => default_value(definition),
            };
            values.insert(name.clone(), value);
        }

        Ok(Self { values })
    }

    /// Look up a resolved value
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Iterate resolved values in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.values.iter()
    }

    /// Canonical `name=value` lines, sorted by name
    pub fn canonical(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Short hash of the canonical option set, used to give each
    /// configuration an exclusive build working directory
    pub fn config_hash(&self) -> String {
        let digest = Sha256::digest(self.canonical().as_bytes());
        let mut hash = hex::encode(digest);
        hash.truncate(defaults::CONFIG_HASH_LEN);
        hash
    }
}

/// Default value declared by an option definition
fn default_value(definition: &OptionDefinition) -> OptionValue {
    match &definition.domain {
        OptionDomain::Bool { default } => OptionValue::Bool(*default),
        OptionDomain::Choice { default, .. } => OptionValue::Choice(default.clone()),
    }
}

/// Validate a single override against its option's domain
fn validate_value(
    name: &str,
    definition: &OptionDefinition,
    value: &OptionValue,
) -> Result<(), OptionError> {
    match (&definition.domain, value) {
        (OptionDomain::Bool { .. }, OptionValue::Bool(_)) => Ok(()),
        (OptionDomain::Choice { choices, .. }, OptionValue::Choice(s)) => {
            if choices.contains(s) {
                Ok(())
            } else {
                Err(OptionError::InvalidOptionValue {
                    name: name.to_string(),
                    value: s.clone(),
                    domain: choices.clone(),
                })
            }
        }
        (OptionDomain::Bool { .. }, other) => Err(OptionError::TypeMismatch {
            name: name.to_string(),
            expected: "bool".to_string(),
            got: other.to_string(),
        }),
        (OptionDomain::Choice { .. }, other) => Err(OptionError::TypeMismatch {
            name: name.to_string(),
            expected: "choice".to_string(),
            got: other.to_string(),
        }),
    }
}

impl OptionDefinition {
    /// Compile-time define reflecting a resolved value (`NAME=1`/`NAME=0`),
    /// if this option declares one
    pub fn define_flag(&self, value: &OptionValue) -> Option<String> {
        let define = self.define.as_ref()?;
        let set = match (value, &self.define_when) {
            (OptionValue::Bool(b), _) => *b,
            (OptionValue::Choice(s), Some(when)) => s == when,
            (OptionValue::Choice(_), None) => false,
        };
        Some(format!("{define}={}", u8::from(set)))
    }

    /// CMake cache toggle (`VAR`, `ON`/`OFF`) reflecting a resolved value,
    /// if this option declares a cmake variable
    pub fn cmake_toggle(&self, value: &OptionValue) -> Option<(String, &'static str)> {
        let var = self.cmake_var.as_ref()?;
        let on = match (value, &self.define_when) {
            (OptionValue::Bool(b), _) => *b,
            (OptionValue::Choice(s), Some(when)) => s == when,
            (OptionValue::Choice(_), None) => false,
        };
        Some((var.clone(), if on { "ON" } else { "OFF" }))
    }
}
