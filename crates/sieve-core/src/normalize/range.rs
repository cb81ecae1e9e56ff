use crate::{
    node::{FilterNode, Mapping},
    normalize::{NormalizeError, Pass},
    vocab::Operator,
};

/// `{start: a, end: b}` → `{between: {start: a, end: b}}`.
///
/// Only the presence of both bounds is checked. Any sibling keys at the same
/// level are dropped by the rewrite.
pub(super) fn expand_implicit_range(node: &FilterNode) -> Result<FilterNode, NormalizeError> {
    match node {
        FilterNode::Scalar(_) => Ok(node.clone()),
        FilterNode::Mapping(map) => {
            if let Some((start, end)) = bounds(map) {
                let inner = Mapping::from_iter([
                    (Operator::Start, expand_implicit_range(start)?),
                    (Operator::End, expand_implicit_range(end)?),
                ]);

                return Ok(FilterNode::entry(Operator::Between, inner));
            }

            Ok(map.try_map_values(expand_implicit_range)?.into())
        }
        FilterNode::Multiset(set) => Ok(set.try_map(expand_implicit_range)?.into()),
        FilterNode::Sequence(_) => Err(NormalizeError::InvalidStructure {
            pass: Pass::ExpandImplicitRange,
        }),
    }
}

/// `{f: {between: {start: a, end: b}}}` → `{f: {gte: a, lte: b}}`.
///
/// Rewrites entry values, so a `between` sitting at the root of the tree is
/// left as is.
pub(super) fn rewrite_range_to_comparison(
    node: &FilterNode,
) -> Result<FilterNode, NormalizeError> {
    match node {
        FilterNode::Scalar(_) => Ok(node.clone()),
        FilterNode::Mapping(map) => Ok(map
            .try_map_values(|value| -> Result<FilterNode, NormalizeError> {
                let range = value
                    .as_mapping()
                    .and_then(|inner| inner.operator(Operator::Between))
                    .and_then(FilterNode::as_mapping)
                    .and_then(bounds);

                match range {
                    Some((start, end)) => Ok(Mapping::from_iter([
                        (Operator::Gte, rewrite_range_to_comparison(start)?),
                        (Operator::Lte, rewrite_range_to_comparison(end)?),
                    ])
                    .into()),
                    None => rewrite_range_to_comparison(value),
                }
            })?
            .into()),
        FilterNode::Multiset(set) => Ok(set.try_map(rewrite_range_to_comparison)?.into()),
        FilterNode::Sequence(_) => Err(NormalizeError::InvalidStructure {
            pass: Pass::RewriteRangeToComparison,
        }),
    }
}

fn bounds(map: &Mapping) -> Option<(&FilterNode, &FilterNode)> {
    Some((map.operator(Operator::Start)?, map.operator(Operator::End)?))
}
