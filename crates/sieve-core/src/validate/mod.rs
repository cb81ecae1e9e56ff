//! Schema-aware validation of filter trees.
//!
//! The validator never fails: every problem it finds becomes an `Issue`
//! and the walk carries on, so one call reports everything wrong with a
//! filter. It accepts canonical and non-canonical trees alike.
//!
//! Within one mapping, entries are visited in order and the context they
//! set is visible to the entries after them. A field must therefore come
//! before an operator that refers to it (`{year: .., gte: ..}` resolves
//! `gte` against `year`; the reverse order does not).

mod context;
mod issue;


pub use issue::{FaultClass, Issue, IssueKind};

use crate::{
    node::{FieldName, FilterNode, Key, Mapping, Multiset},
    schema::SchemaView,
    vocab::Operator,
};
use context::{Context, PathSegment, render_path};

///
/// ValidationReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Every issue rendered as `path: message`, in discovery order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn has_structural_faults(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.kind.class() == FaultClass::Structural)
    }

    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

///
/// Validator
///
/// Bound to one resolved schema view. Cheap to build; holds no per-call
/// state, so one validator can serve many threads.
///

#[derive(Clone, Debug)]
pub struct Validator<'s> {
    schema: SchemaView<'s>,
}

impl<'s> Validator<'s> {
    #[must_use]
    pub const fn new(schema: SchemaView<'s>) -> Self {
        Self { schema }
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaView<'s> {
        &self.schema
    }

    #[must_use]
    pub fn validate(&self, node: &FilterNode) -> ValidationReport {
        self.validate_with(node, Vec::new())
    }

    /// Validate, appending to issues found by earlier validators in a chain.
    #[must_use]
    pub fn validate_with(&self, node: &FilterNode, prior: Vec<Issue>) -> ValidationReport {
        let mut walk = Walk {
            schema: &self.schema,
            path: Vec::new(),
            issues: prior,
        };

        if !matches!(node, FilterNode::Mapping(_)) {
            walk.report(
                IssueKind::ExpectedMapping,
                format!("filter must be a mapping, found {}", node.kind()),
            );
        }
        walk.node(node, Context::default());

        tracing::debug!(
            dataset = self.schema.name(),
            issues = walk.issues.len(),
            "validated filter"
        );

        ValidationReport { issues: walk.issues }
    }
}

/// Validate `node` against `schema`.
#[must_use]
pub fn validate(node: &FilterNode, schema: &SchemaView<'_>) -> ValidationReport {
    Validator::new(schema.clone()).validate(node)
}

///
/// Walk
///
/// State of one validation call: where we are and what we found.
///

struct Walk<'v, 's, 'n> {
    schema: &'v SchemaView<'s>,
    path: Vec<PathSegment<'n>>,
    issues: Vec<Issue>,
}

impl<'n> Walk<'_, '_, 'n> {
    fn node(&mut self, node: &'n FilterNode, ctx: Context<'n>) {
        match node {
            FilterNode::Scalar(_) => self.operand(node, ctx),
            FilterNode::Mapping(map) => self.mapping(map, ctx),
            FilterNode::Multiset(set) => self.multiset(set, ctx),
            FilterNode::Sequence(_) => self.report(
                IssueKind::InvalidStructure,
                "raw sequence found; arrays must be lifted into multisets",
            ),
        }
    }

    // `ctx` is this call's own copy; updates made by earlier entries are
    // seen by later ones and vanish when the mapping is done
    fn mapping(&mut self, map: &'n Mapping, mut ctx: Context<'n>) {
        let entry_operator = ctx.parent_operator;

        for (key, value) in map.iter() {
            self.path.push(PathSegment::Key(key.as_str()));

            match key {
                Key::Operator(op) => {
                    self.operator(*op, ctx);
                    if *op == Operator::Dataset && entry_operator == Some(Operator::Foreign) {
                        self.foreign_reference(value);
                    }
                    ctx.parent_operator = Some(*op);
                    self.node(value, ctx);
                }
                Key::Field(field) => {
                    let known = self.schema.has_field(field);
                    if !known {
                        self.report(
                            IssueKind::UnknownKey,
                            format!(
                                "'{field}' is neither an operator nor a field of dataset '{}'",
                                self.schema.name()
                            ),
                        );
                    }

                    if known {
                        ctx.parent_field = Some(field);
                    }

                    match value {
                        FilterNode::Scalar(_) if known => self.scalar_for(field, value),
                        FilterNode::Scalar(_) => {}
                        _ => self.node(value, ctx),
                    }
                }
            }

            self.path.pop();
        }
    }

    fn multiset(&mut self, set: &'n Multiset, ctx: Context<'n>) {
        match ctx.parent_operator {
            Some(op) if op.is_logical() => {
                for (index, element) in set.iter().enumerate() {
                    self.path.push(PathSegment::Index(index));
                    if !matches!(element, FilterNode::Mapping(_)) {
                        self.report(
                            IssueKind::ExpectedMapping,
                            format!("members of '{op}' must be mappings, found {}", element.kind()),
                        );
                    }
                    self.node(element, ctx);
                    self.path.pop();
                }
            }
            Some(op) if op.is_membership() => self.enumeration(set, op, ctx.parent_field),
            Some(op) => self.report(
                IssueKind::MissingContext,
                format!("a multiset cannot be the operand of '{op}'; expected 'and', 'or' or 'in'"),
            ),
            None => self.report(
                IssueKind::MissingContext,
                "a multiset needs an enclosing 'and', 'or' or 'in'",
            ),
        }
    }

    fn enumeration(&mut self, set: &'n Multiset, op: Operator, field: Option<&'n FieldName>) {
        if field.is_none() {
            self.report(
                IssueKind::MissingFieldContext,
                format!("'{op}' needs an enclosing field"),
            );
        }

        for (index, element) in set.iter().enumerate() {
            self.path.push(PathSegment::Index(index));
            if element.is_composite() {
                self.report(
                    IssueKind::CompositeWhereScalarExpected,
                    format!("members of '{op}' must be scalars, found {}", element.kind()),
                );
            } else if let Some(field) = field {
                self.scalar_for(field, element);
            }
            self.path.pop();
        }
    }

    fn operator(&mut self, op: Operator, ctx: Context<'n>) {
        if !self.schema.has_operator(op) {
            self.report(
                IssueKind::OperatorNotPermitted,
                format!(
                    "operator '{op}' is not permitted by dataset '{}'",
                    self.schema.name()
                ),
            );
            return;
        }

        let mut messages = Vec::new();
        self.schema
            .validate_operator(op, ctx.parent_field.map(FieldName::as_str), &mut messages);
        self.report_all(IssueKind::OperatorNotPermitted, messages);
    }

    // a scalar reached directly under a comparison is compared with the field
    fn operand(&mut self, value: &FilterNode, ctx: Context<'n>) {
        if let (Some(op), Some(field)) = (ctx.parent_operator, ctx.parent_field)
            && op.takes_field_operand()
        {
            self.scalar_for(field, value);
        }
    }

    fn foreign_reference(&mut self, value: &FilterNode) {
        let name = value.as_scalar().and_then(|s| s.as_text());

        match name {
            Some(name) if self.schema.has_foreign(name) => {}
            Some(name) => self.report(
                IssueKind::UnknownForeign,
                format!(
                    "'{name}' is not a foreign dataset of '{}'",
                    self.schema.name()
                ),
            ),
            None => self.report(
                IssueKind::UnknownForeign,
                format!("'dataset' must name a foreign dataset, found {value}"),
            ),
        }
    }

    // value constraints are only meaningful once the type conforms
    fn scalar_for(&mut self, field: &str, value: &FilterNode) {
        let mut messages = Vec::new();
        self.schema.validate_type(value, field, &mut messages);
        if !messages.is_empty() {
            self.report_all(IssueKind::TypeMismatch, messages);
            return;
        }

        self.schema.validate_value(value, field, &mut messages);
        self.report_all(IssueKind::ValueConstraintViolation, messages);
    }

    fn report(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.issues
            .push(Issue::new(kind, render_path(&self.path), message));
    }

    fn report_all(&mut self, kind: IssueKind, messages: Vec<String>) {
        for message in messages {
            self.report(kind, message);
        }
    }
}
