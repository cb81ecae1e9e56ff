use crate::{node::FieldName, vocab::Operator};
use std::fmt::Write;

///
/// Context
///
/// The nearest enclosing operator and field. A value, not a shared record:
/// each recursive call receives its own copy, so a branch can never leak
/// context into its siblings or its caller.
///

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct Context<'n> {
    pub(super) parent_operator: Option<Operator>,
    pub(super) parent_field: Option<&'n FieldName>,
}

///
/// PathSegment
///

#[derive(Clone, Copy, Debug)]
pub(super) enum PathSegment<'n> {
    Key(&'n str),
    Index(usize),
}

pub(super) fn render_path(path: &[PathSegment<'_>]) -> String {
    let mut out = String::new();

    for (i, seg) in path.iter().enumerate() {
        match seg {
            PathSegment::Key(key) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
        }
    }

    out
}
