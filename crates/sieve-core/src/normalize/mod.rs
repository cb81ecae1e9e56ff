//! Canonicalizing rewrite passes.
//!
//! Three passes always run in one fixed order. A caller may switch passes
//! off but can never reorder them:
//!
//! 1. `ExpandImplicitRange`: `{start, end}` becomes `{between: {start, end}}`
//! 2. `RewriteRangeToComparison`: `{f: {between: {start, end}}}` becomes
//!    `{f: {gte, lte}}`
//! 3. `ExpandImplicitConjunction`: every mapping carrying more than one
//!    constraint becomes an explicit `{and: [...]}`
//!
//! The passes are pure functions over borrowed trees and abort on the first
//! structural fault.

mod conjunction;
mod range;


use crate::node::FilterNode;
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// NormalizeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum NormalizeError {
    #[error("raw sequence reached the {pass} pass; arrays must be lifted into multisets first")]
    InvalidStructure { pass: Pass },

    #[error("mapping mixes keys of different categories: {}", .keys.join(", "))]
    InvalidMixedKeys { keys: Vec<String> },

    #[error("operators {} need an enclosing field", .operators.join(", "))]
    MissingFieldContext { operators: Vec<String> },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

///
/// Pass
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Pass {
    ExpandImplicitRange,
    RewriteRangeToComparison,
    ExpandImplicitConjunction,
}

impl Pass {
    /// Every pass, in the only order passes ever run.
    pub const ALL: [Self; 3] = [
        Self::ExpandImplicitRange,
        Self::RewriteRangeToComparison,
        Self::ExpandImplicitConjunction,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExpandImplicitRange => "expand_implicit_range",
            Self::RewriteRangeToComparison => "rewrite_range_to_comparison",
            Self::ExpandImplicitConjunction => "expand_implicit_conjunction",
        }
    }

    fn apply(self, node: &FilterNode) -> Result<FilterNode, NormalizeError> {
        match self {
            Self::ExpandImplicitRange => range::expand_implicit_range(node),
            Self::RewriteRangeToComparison => range::rewrite_range_to_comparison(node),
            Self::ExpandImplicitConjunction => conjunction::expand_implicit_conjunction(node, None),
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pass {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pass| pass.as_str() == s)
            .ok_or_else(|| NormalizeError::InvalidArgument(format!("unknown pass '{s}'")))
    }
}

/// Resolve textual pass names. Duplicates are kept; `normalize_with`
/// ignores them.
pub fn parse_passes<S: AsRef<str>>(names: &[S]) -> Result<Vec<Pass>, NormalizeError> {
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Run every pass.
pub fn normalize(node: &FilterNode) -> Result<FilterNode, NormalizeError> {
    normalize_with(node, &Pass::ALL)
}

/// Run the selected passes in their fixed order.
pub fn normalize_with(node: &FilterNode, passes: &[Pass]) -> Result<FilterNode, NormalizeError> {
    let mut current = node.clone();

    for pass in Pass::ALL.into_iter().filter(|pass| passes.contains(pass)) {
        tracing::trace!(pass = pass.as_str(), "normalize pass");
        current = pass.apply(&current)?;
    }

    Ok(current)
}
