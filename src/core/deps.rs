//! Dependency requirement selection
//!
//! Turns resolved option values into an ordered, duplicate-free set of
//! upstream requirements. Selection is a pure lookup over the recipe's
//! requirement table, so identical options always yield an identical set.

use semver::VersionReq;

use crate::core::options::ResolvedOptions;
use crate::core::recipe::Recipe;
use crate::error::DependencyError;

/// A selected upstream requirement
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRequirement {
    /// Upstream package name
    pub package: String,
    /// Version constraint the resolver must satisfy
    pub constraint: VersionReq,
}

impl std::fmt::Display for DependencyRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.package, self.constraint)
    }
}

/// Select the requirements that apply under the given options
///
/// Rules are evaluated in declaration order; a rule applies when every
/// entry of its `when` map equals the resolved value (an empty map applies
/// unconditionally). Later rules naming an already selected package are
/// dropped.
pub fn select_requirements(
    recipe: &Recipe,
    options: &ResolvedOptions,
) -> Result<Vec<DependencyRequirement>, DependencyError> {
    let mut selected: Vec<DependencyRequirement> = Vec::new();

    for rule in &recipe.requirements {
        let applies = rule
            .when
            .iter()
            .all(|(name, expected)| options.get(name) == Some(expected));
        if !applies {
            continue;
        }
        if selected.iter().any(|req| req.package == rule.package) {
            continue;
        }

        let constraint = VersionReq::parse(&rule.version).map_err(|e| {
            DependencyError::InvalidConstraint {
                package: rule.package.clone(),
                constraint: rule.version.clone(),
                error: e.to_string(),
            }
        })?;

        selected.push(DependencyRequirement {
            package: rule.package.clone(),
            constraint,
        });
    }

    Ok(selected)
}
