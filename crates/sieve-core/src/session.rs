//! Request-level driver: resolve a dataset, parse, normalize, validate.

use crate::{
    Error,
    node::FilterNode,
    normalize::{Pass, normalize_with},
    parse::parse,
    schema::SchemaRegistry,
    validate::Validator,
};
use thiserror::Error as ThisError;

///
/// Accepted
///
/// A filter that passed validation, in canonical form.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Accepted {
    pub dataset: String,
    pub filter: FilterNode,
}

///
/// Rejection
///
/// The verbatim issue list for a filter that failed validation.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("filter rejected by dataset '{dataset}' ({} issues)", .errors.len())]
pub struct Rejection {
    pub dataset: String,
    pub errors: Vec<String>,
}

///
/// Outcome
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Accepted(Accepted),
    Rejected(Rejection),
}

impl Outcome {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn into_result(self) -> Result<Accepted, Rejection> {
        match self {
            Self::Accepted(accepted) => Ok(accepted),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

///
/// Session
///
/// Borrows a registry for the duration of a request. `Err` means the
/// request could not be evaluated at all (bad json, unknown dataset,
/// malformed filter shape); a filter that was evaluated and found wanting
/// comes back as `Outcome::Rejected`.
///

#[derive(Clone, Debug)]
pub struct Session<'r> {
    registry: &'r SchemaRegistry,
    passes: Vec<Pass>,
}

impl<'r> Session<'r> {
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            passes: Pass::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn with_passes(mut self, passes: impl IntoIterator<Item = Pass>) -> Self {
        self.passes = passes.into_iter().collect();
        self
    }

    /// Check filter text against `dataset`, or the registry default.
    pub fn check(&self, dataset: Option<&str>, text: &str) -> Result<Outcome, Error> {
        let node = parse(text)?;

        self.check_node(dataset, &node)
    }

    pub fn check_node(&self, dataset: Option<&str>, node: &FilterNode) -> Result<Outcome, Error> {
        let view = match dataset {
            Some(name) => self.registry.view(name)?,
            None => self.registry.default_view()?,
        };
        let dataset = view.name().to_string();

        let filter = normalize_with(node, &self.passes)?;
        let report = Validator::new(view).validate(&filter);

        if report.is_valid() {
            return Ok(Outcome::Accepted(Accepted { dataset, filter }));
        }

        let errors = report.messages();
        tracing::debug!(dataset = %dataset, issues = errors.len(), "filter rejected");

        Ok(Outcome::Rejected(Rejection { dataset, errors }))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normalize::NormalizeError, schema::RegistryError, test_fixtures};

    #[test]
    fn valid_filter_is_accepted_in_canonical_form() {
        let registry = test_fixtures::registry();
        let outcome = Session::new(&registry)
            .check(Some("car"), r#"{"make": "chevy", "year": 2010}"#)
            .expect("evaluated");

        let accepted = outcome.into_result().expect("accepted");
        assert_eq!(accepted.dataset, "car");
        assert_eq!(
            accepted.filter,
            parse(r#"{"and": [{"make": "chevy"}, {"year": 2010}]}"#).expect("parse")
        );
    }

    #[test]
    fn invalid_filter_is_rejected_with_every_message() {
        let registry = test_fixtures::registry();
        let outcome = Session::new(&registry)
            .check(Some("person"), r#"{"age": -1, "nickname": "x"}"#)
            .expect("evaluated");

        let rejection = outcome.into_result().expect_err("rejected");
        assert_eq!(rejection.dataset, "person");
        assert_eq!(rejection.errors.len(), 2);
        assert!(rejection.errors[1].contains("nickname"));
    }

    #[test]
    fn default_dataset_is_used_when_none_is_named() {
        let registry = test_fixtures::registry();
        let outcome = Session::new(&registry)
            .check(None, r#"{"name": {"in": ["Alien"]}}"#)
            .expect("evaluated");

        assert!(outcome.is_accepted());
    }

    #[test]
    fn empty_input_is_accepted() {
        let registry = test_fixtures::registry();
        let outcome = Session::new(&registry).check(Some("movie"), "").expect("evaluated");

        assert!(outcome.is_accepted());
    }

    #[test]
    fn unknown_dataset_is_an_error() {
        let registry = test_fixtures::registry();
        let err = Session::new(&registry)
            .check(Some("boat"), "{}")
            .expect_err("unknown dataset");

        assert!(matches!(
            err,
            Error::Registry(RegistryError::UnknownSchema { .. })
        ));
    }

    #[test]
    fn malformed_shape_is_an_error() {
        let registry = test_fixtures::registry();
        let err = Session::new(&registry)
            .check(Some("car"), r#"{"gte": 1, "make": "chevy"}"#)
            .expect_err("mixed keys");

        assert!(matches!(
            err,
            Error::Normalize(NormalizeError::InvalidMixedKeys { .. })
        ));
    }

    #[test]
    fn selected_passes_are_honoured() {
        let registry = test_fixtures::registry();
        let outcome = Session::new(&registry)
            .with_passes([])
            .check(Some("car"), r#"{"make": "chevy", "year": 2010}"#)
            .expect("evaluated");

        let accepted = outcome.into_result().expect("accepted");
        assert_eq!(
            accepted.filter,
            parse(r#"{"make": "chevy", "year": 2010}"#).expect("parse")
        );
    }
}
