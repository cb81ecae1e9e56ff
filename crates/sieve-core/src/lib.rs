//! Core engines for the sieve filter language: the filter node model, the
//! operator vocabulary, the canonicalizing normalizer, and the schema-aware
//! validator, plus the collaborators they are wired to (JSON parser, schema
//! registry, request session).
#![warn(unreachable_pub)]

pub mod error;
pub mod node;
pub mod normalize;
pub mod parse;
pub mod schema;
pub mod session;
pub mod validate;
pub mod vocab;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, engines, or registries are re-exported here.
///

pub mod prelude {
    pub use crate::{
        node::{FieldName, FilterNode, Key, Mapping, Multiset, Scalar},
        vocab::{Operator, OperatorCategory},
    };
}
