use std::fmt;

///
/// FaultClass
///
/// Structural faults mean the filter's shape breaks the grammar; semantic
/// faults mean a well-formed filter asks for something the dataset does not
/// allow.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FaultClass {
    Structural,
    Semantic,
}

///
/// IssueKind
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IssueKind {
    // structural
    InvalidStructure,
    MissingContext,
    MissingFieldContext,
    ExpectedMapping,
    CompositeWhereScalarExpected,

    // semantic
    UnknownKey,
    OperatorNotPermitted,
    TypeMismatch,
    ValueConstraintViolation,
    UnknownForeign,
}

impl IssueKind {
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::InvalidStructure
            | Self::MissingContext
            | Self::MissingFieldContext
            | Self::ExpectedMapping
            | Self::CompositeWhereScalarExpected => FaultClass::Structural,
            Self::UnknownKey
            | Self::OperatorNotPermitted
            | Self::TypeMismatch
            | Self::ValueConstraintViolation
            | Self::UnknownForeign => FaultClass::Semantic,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidStructure => "invalid_structure",
            Self::MissingContext => "missing_context",
            Self::MissingFieldContext => "missing_field_context",
            Self::ExpectedMapping => "expected_mapping",
            Self::CompositeWhereScalarExpected => "composite_where_scalar_expected",
            Self::UnknownKey => "unknown_key",
            Self::OperatorNotPermitted => "operator_not_permitted",
            Self::TypeMismatch => "type_mismatch",
            Self::ValueConstraintViolation => "value_constraint_violation",
            Self::UnknownForeign => "unknown_foreign",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Issue
///
/// One problem found while validating. `path` locates the offending node
/// as dotted keys with bracketed multiset positions (`and[1].year.gte`);
/// it is empty at the root.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Issue {
    pub kind: IssueKind,
    pub path: String,
    pub message: String,
}

impl Issue {
    #[must_use]
    pub fn new(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}
