use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// Operator
///
/// The closed vocabulary of non-field keys. A key that spells one of these
/// names is always an operator; every other key is a field name.
///

#[remain::sorted]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Operator {
    And,
    Between,
    Dataset,
    End,
    Eq,
    Filter,
    Foreign,
    Given,
    Gt,
    Gte,
    In,
    Lt,
    Lte,
    Neg,
    Or,
    Partial,
    Start,
}

impl Operator {
    /// Every operator in the vocabulary, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::And,
        Self::Between,
        Self::Dataset,
        Self::End,
        Self::Eq,
        Self::Filter,
        Self::Foreign,
        Self::Given,
        Self::Gt,
        Self::Gte,
        Self::In,
        Self::Lt,
        Self::Lte,
        Self::Neg,
        Self::Or,
        Self::Partial,
        Self::Start,
    ];

    pub const LOGICAL: [Self; 2] = [Self::And, Self::Or];

    pub const COMPARISON: [Self; 10] = [
        Self::In,
        Self::Between,
        Self::Start,
        Self::End,
        Self::Eq,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::Neg,
    ];

    pub const PARTIAL: [Self; 3] = [Self::Partial, Self::Given, Self::Filter];

    pub const FOREIGN: [Self; 3] = [Self::Foreign, Self::Dataset, Self::Filter];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Between => "between",
            Self::Dataset => "dataset",
            Self::End => "end",
            Self::Eq => "eq",
            Self::Filter => "filter",
            Self::Foreign => "foreign",
            Self::Given => "given",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::In => "in",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Neg => "neg",
            Self::Or => "or",
            Self::Partial => "partial",
            Self::Start => "start",
        }
    }

    /// Resolve a key spelling to an operator, if it is one.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }

    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Comparison, range, and membership operators.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::In
                | Self::Between
                | Self::Start
                | Self::End
                | Self::Eq
                | Self::Lt
                | Self::Lte
                | Self::Gt
                | Self::Gte
                | Self::Neg
        )
    }

    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::In)
    }

    #[must_use]
    pub const fn is_partial(self) -> bool {
        matches!(self, Self::Partial | Self::Given | Self::Filter)
    }

    #[must_use]
    pub const fn is_foreign(self) -> bool {
        matches!(self, Self::Foreign | Self::Dataset | Self::Filter)
    }

    /// Partial and foreign operators introduce self-contained clause bodies.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        self.is_partial() || self.is_foreign()
    }

    /// Operators whose scalar operand is compared directly against a field.
    #[must_use]
    pub const fn takes_field_operand(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Lt | Self::Lte | Self::Gt | Self::Gte | Self::Start | Self::End
        )
    }

    /// The category used to decide whether keys of one mapping may coexist.
    /// `filter` is both partial and foreign; both map to `Structural`.
    #[must_use]
    pub const fn category(self) -> OperatorCategory {
        if self.is_logical() {
            OperatorCategory::Logical
        } else if self.is_comparison() {
            OperatorCategory::Comparison
        } else {
            OperatorCategory::Structural
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// UnknownOperator
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown operator '{0}'")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

///
/// OperatorCategory
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperatorCategory {
    Logical,
    Comparison,
    Structural,
}

///
/// TESTS
///
