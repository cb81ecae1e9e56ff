mod mapping;
mod multiset;
mod scalar;
mod serialize;

#[cfg(test)]
mod tests;

pub use mapping::Mapping;
pub use multiset::Multiset;
pub use scalar::{Float64, Scalar};

use crate::vocab::Operator;
use derive_more::{Deref, Display};
use std::fmt;

///
/// FieldName
///
/// A schema-defined key. Never spells an operator when produced by
/// `Key::parse`.
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FieldName(String);

impl FieldName {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// Key
///
/// A mapping key, classified once at construction as either an operator
/// from the closed vocabulary or a field name.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Key {
    Operator(Operator),
    Field(FieldName),
}

impl Key {
    /// Classify a key spelling.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        Operator::lookup(name).map_or_else(|| Self::Field(FieldName::new(name)), Self::Operator)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Operator(op) => op.as_str(),
            Self::Field(name) => name.as_str(),
        }
    }

    #[must_use]
    pub const fn operator(&self) -> Option<Operator> {
        match self {
            Self::Operator(op) => Some(*op),
            Self::Field(_) => None,
        }
    }

    #[must_use]
    pub const fn field_name(&self) -> Option<&FieldName> {
        match self {
            Self::Operator(_) => None,
            Self::Field(name) => Some(name),
        }
    }

    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operator> for Key {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

impl From<FieldName> for Key {
    fn from(name: FieldName) -> Self {
        Self::Field(name)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

///
/// NodeKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum NodeKind {
    #[display("scalar")]
    Scalar,
    #[display("mapping")]
    Mapping,
    #[display("multiset")]
    Multiset,
    #[display("sequence")]
    Sequence,
}

///
/// FilterNode
///
/// The value every engine operates on.
///
/// `Sequence` is a raw, un-deduplicated array exactly as a parser read it.
/// It must be lifted into a `Multiset` before reaching the normalizer or
/// validator; both reject it as a structural fault.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FilterNode {
    Scalar(Scalar),
    Mapping(Mapping),
    Multiset(Multiset),
    Sequence(Vec<Self>),
}

impl FilterNode {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Multiset(_) => NodeKind::Multiset,
            Self::Sequence(_) => NodeKind::Sequence,
        }
    }

    /// Mappings, multisets and sequences can be iterated; scalars cannot.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_multiset(&self) -> Option<&Multiset> {
        match self {
            Self::Multiset(s) => Some(s),
            _ => None,
        }
    }

    /// Build `{ key: value }`.
    #[must_use]
    pub fn entry(key: impl Into<Key>, value: impl Into<Self>) -> Self {
        Self::Mapping(Mapping::single(key, value))
    }

    /// Build `{ and: [clauses...] }`.
    #[must_use]
    pub fn and(clauses: impl IntoIterator<Item = Self>) -> Self {
        Self::entry(Operator::And, Multiset::from_iter(clauses))
    }

    /// Build `{ or: [clauses...] }`.
    #[must_use]
    pub fn or(clauses: impl IntoIterator<Item = Self>) -> Self {
        Self::entry(Operator::Or, Multiset::from_iter(clauses))
    }

    /// Replace every raw `Sequence` in the tree with a deduplicated
    /// `Multiset`, bottom-up.
    #[must_use]
    pub fn lift_sequences(self) -> Self {
        match self {
            Self::Scalar(_) => self,
            Self::Mapping(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, value.lift_sequences()))
                    .collect(),
            ),
            Self::Multiset(set) => {
                Self::Multiset(set.into_iter().map(Self::lift_sequences).collect())
            }
            Self::Sequence(items) => {
                Self::Multiset(items.into_iter().map(Self::lift_sequences).collect())
            }
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<Scalar> for FilterNode {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_node_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FilterNode {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::from(value))
                }
            }
        )*
    };
}

scalar_node_from!(bool, i32, i64, &str, String);

impl From<Mapping> for FilterNode {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Multiset> for FilterNode {
    fn from(set: Multiset) -> Self {
        Self::Multiset(set)
    }
}
