use crate::{
    node::{FilterNode, Scalar},
    schema::Schema,
    vocab::Operator,
};
use chrono::NaiveDate;
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

///
/// FieldType
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum FieldType {
    #[default]
    Any,
    Bool,
    Date,
    Float,
    Int,
    Number,
    Text,
}

impl FieldType {
    pub const ALL: [Self; 7] = [
        Self::Any,
        Self::Bool,
        Self::Date,
        Self::Float,
        Self::Int,
        Self::Number,
        Self::Text,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Date => "date",
            Self::Float => "float",
            Self::Int => "int",
            Self::Number => "number",
            Self::Text => "text",
        }
    }

    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }

    /// Whether a scalar is acceptable for a field of this type.
    ///
    /// Floats accept integers; dates accept `YYYY-MM-DD` text; only `Any`
    /// accepts null.
    #[must_use]
    pub fn accepts(self, value: &Scalar) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Bool, Scalar::Bool(_))
            | (Self::Int, Scalar::Int(_))
            | (Self::Float | Self::Number, Scalar::Int(_) | Scalar::Float(_))
            | (Self::Text, Scalar::Text(_))
            | (Self::Date, Scalar::Date(_)) => true,
            (Self::Date, Scalar::Text(s)) => NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok(),
            _ => false,
        }
    }

    /// Whether numeric bounds make sense for this type.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Int | Self::Number)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// ValueConstraints
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub one_of: Vec<Scalar>,
}

impl ValueConstraints {
    fn check(&self, value: &Scalar, field: &str, errors: &mut Vec<String>) {
        let listed = self.one_of.iter().any(|allowed| same_value(allowed, value));
        if !self.one_of.is_empty() && !listed {
            let allowed: Vec<String> = self.one_of.iter().map(ToString::to_string).collect();
            errors.push(format!(
                "value {value} for field '{field}' is not one of [{}]",
                allowed.join(", ")
            ));
        }

        if let Some(v) = value.as_f64() {
            if let Some(min) = self.min
                && v < min
            {
                errors.push(format!("value {value} for field '{field}' is below minimum {min}"));
            }
            if let Some(max) = self.max
                && v > max
            {
                errors.push(format!("value {value} for field '{field}' is above maximum {max}"));
            }
        }

        if let Some(text) = value.as_text() {
            let len = text.chars().count();
            if let Some(min_len) = self.min_len
                && len < min_len
            {
                errors.push(format!(
                    "value {value} for field '{field}' is shorter than {min_len} characters"
                ));
            }
            if let Some(max_len) = self.max_len
                && len > max_len
            {
                errors.push(format!(
                    "value {value} for field '{field}' is longer than {max_len} characters"
                ));
            }
        }
    }
}

// numbers compare by value, so `1` and `1.0` name the same allowed value
fn same_value(allowed: &Scalar, value: &Scalar) -> bool {
    match (allowed.as_f64(), value.as_f64()) {
        (Some(a), Some(b)) => a.total_cmp(&b).is_eq(),
        _ => allowed == value,
    }
}

///
/// FieldDef
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldDef {
    pub ty: FieldType,
    pub operators: Option<BTreeSet<Operator>>,
    pub constraints: ValueConstraints,
}

impl FieldDef {
    #[must_use]
    pub fn new(ty: FieldType) -> Self {
        Self {
            ty,
            ..Self::default()
        }
    }

    /// Restrict the comparison operators usable on this field.
    #[must_use]
    pub fn operators(mut self, ops: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = Some(ops.into_iter().collect());
        self
    }

    #[must_use]
    pub fn one_of<V: Into<Scalar>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.constraints.one_of = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    #[must_use]
    pub const fn max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    #[must_use]
    pub const fn min_len(mut self, len: usize) -> Self {
        self.constraints.min_len = Some(len);
        self
    }

    #[must_use]
    pub const fn max_len(mut self, len: usize) -> Self {
        self.constraints.max_len = Some(len);
        self
    }
}

///
/// DatasetSchema
///
/// Data-driven `Schema`: named fields with a type, optional per-field
/// operator rules and value constraints, a dataset-wide operator set, and
/// the foreign relations it may delegate to.
///

#[derive(Clone, Debug)]
pub struct DatasetSchema {
    name: String,
    fields: BTreeMap<String, FieldDef>,
    operators: BTreeSet<Operator>,
    foreigns: Vec<String>,
}

impl DatasetSchema {
    /// A dataset that permits the whole operator vocabulary.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            operators: Operator::ALL.into_iter().collect(),
            foreigns: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Replace the dataset-wide operator set.
    #[must_use]
    pub fn operators(mut self, ops: impl IntoIterator<Item = Operator>) -> Self {
        self.operators = ops.into_iter().collect();
        self
    }

    #[must_use]
    pub fn foreign(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.foreigns.contains(&name) {
            self.foreigns.push(name);
        }
        self
    }

    #[must_use]
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}

impl Schema for DatasetSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> BTreeSet<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    fn operators(&self) -> BTreeSet<Operator> {
        self.operators.clone()
    }

    fn foreigns(&self) -> &[String] {
        &self.foreigns
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn has_operator(&self, op: Operator) -> bool {
        self.operators.contains(&op)
    }

    fn validate_type(&self, value: &FilterNode, field: &str, errors: &mut Vec<String>) {
        let Some(def) = self.fields.get(field) else {
            return;
        };

        match value {
            FilterNode::Scalar(scalar) if def.ty.accepts(scalar) => {}
            FilterNode::Scalar(scalar) => errors.push(format!(
                "field '{field}' expects {}, found {} {scalar}",
                def.ty,
                scalar.kind()
            )),
            other => errors.push(format!(
                "field '{field}' expects {}, found {}",
                def.ty,
                other.kind()
            )),
        }
    }

    fn validate_value(&self, value: &FilterNode, field: &str, errors: &mut Vec<String>) {
        let (Some(def), Some(scalar)) = (self.fields.get(field), value.as_scalar()) else {
            return;
        };

        def.constraints.check(scalar, field, errors);
    }

    fn validate_operator(&self, op: Operator, field: Option<&str>, errors: &mut Vec<String>) {
        if !op.is_comparison() {
            return;
        }

        let allowed = field
            .and_then(|f| self.fields.get(f))
            .and_then(|def| def.operators.as_ref());

        if let (Some(field), Some(allowed)) = (field, allowed)
            && !allowed.contains(&op)
        {
            errors.push(format!(
                "operator '{op}' is not permitted on field '{field}' of dataset '{}'",
                self.name
            ));
        }
    }
}
