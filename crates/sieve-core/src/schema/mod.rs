//! Dataset schemas and the registry that resolves them by name.

mod dataset;
mod registry;

#[cfg(test)]
mod tests;

pub use dataset::{DatasetSchema, FieldDef, FieldType, ValueConstraints};
pub use registry::{RegistryError, SchemaRegistry};

use crate::{node::FilterNode, vocab::Operator};
use std::collections::BTreeSet;

///
/// Schema
///
/// The contract a dataset definition satisfies. Schemas are built once and
/// are read-only while filters are validated against them.
///
/// The `validate_*` hooks push one human-readable message per problem onto
/// `errors` and never clear it.
///

pub trait Schema: Send + Sync {
    fn name(&self) -> &str;

    fn fields(&self) -> BTreeSet<&str>;

    fn operators(&self) -> BTreeSet<Operator>;

    /// Names of the datasets this one may delegate to.
    fn foreigns(&self) -> &[String];

    fn has_field(&self, name: &str) -> bool {
        self.fields().contains(name)
    }

    fn has_operator(&self, op: Operator) -> bool {
        self.operators().contains(&op)
    }

    /// Check that `value` has a type `field` accepts.
    fn validate_type(&self, value: &FilterNode, field: &str, errors: &mut Vec<String>);

    /// Check a correctly typed `value` against the constraints of `field`.
    fn validate_value(&self, value: &FilterNode, field: &str, errors: &mut Vec<String>);

    /// Check that `op` may be applied to `field`. Datasets without per-field
    /// operator rules accept everything.
    fn validate_operator(&self, _op: Operator, _field: Option<&str>, _errors: &mut Vec<String>) {}
}

///
/// SchemaView
///
/// A schema together with its immediate foreign relations, resolved.
/// Lookups see the union of the root's declarations and each foreign's own
/// declarations; a foreign's foreigns are never consulted.
///

#[derive(Clone)]
pub struct SchemaView<'a> {
    root: &'a dyn Schema,
    foreigns: Vec<&'a dyn Schema>,
}

impl<'a> SchemaView<'a> {
    #[must_use]
    pub fn new(root: &'a dyn Schema, foreigns: Vec<&'a dyn Schema>) -> Self {
        Self { root, foreigns }
    }

    /// A view with no foreign relations resolved.
    #[must_use]
    pub fn standalone(root: &'a dyn Schema) -> Self {
        Self::new(root, Vec::new())
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        self.root.name()
    }

    #[must_use]
    pub fn root(&self) -> &'a dyn Schema {
        self.root
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.owner(name).is_some()
    }

    #[must_use]
    pub fn has_operator(&self, op: Operator) -> bool {
        self.root.has_operator(op) || self.foreigns.iter().any(|s| s.has_operator(op))
    }

    /// Whether `name` is one of the root's declared foreign relations.
    #[must_use]
    pub fn has_foreign(&self, name: &str) -> bool {
        self.root.foreigns().iter().any(|f| f == name)
    }

    /// The schema that declares `field`, root first.
    #[must_use]
    pub fn owner(&self, field: &str) -> Option<&'a dyn Schema> {
        if self.root.has_field(field) {
            return Some(self.root);
        }

        self.foreigns.iter().copied().find(|s| s.has_field(field))
    }

    pub fn validate_type(&self, value: &FilterNode, field: &str, errors: &mut Vec<String>) {
        if let Some(owner) = self.owner(field) {
            owner.validate_type(value, field, errors);
        }
    }

    pub fn validate_value(&self, value: &FilterNode, field: &str, errors: &mut Vec<String>) {
        if let Some(owner) = self.owner(field) {
            owner.validate_value(value, field, errors);
        }
    }

    pub fn validate_operator(&self, op: Operator, field: Option<&str>, errors: &mut Vec<String>) {
        let owner = field.and_then(|f| self.owner(f)).unwrap_or(self.root);
        owner.validate_operator(op, field, errors);
    }
}

impl std::fmt::Debug for SchemaView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaView")
            .field("root", &self.root.name())
            .field(
                "foreigns",
                &self.foreigns.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
