use crate::{normalize::NormalizeError, parse::ParseError, schema::RegistryError};
use thiserror::Error as ThisError;

///
/// Error
///
/// Umbrella error for callers that drive a filter from text to a
/// validated tree and want one error type.
/// Validation issues are not errors; they travel in a `ValidationReport`.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
