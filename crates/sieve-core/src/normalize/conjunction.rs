use crate::{
    node::{FilterNode, Key, Mapping, Multiset},
    normalize::{NormalizeError, Pass},
    vocab::{Operator, OperatorCategory},
};

///
/// Make every implicit conjunction explicit.
///
/// A mapping is read by the category of its first key:
/// - logical: self-contained bodies, every key must be logical
/// - comparison: an operator body of the enclosing field; several operators
///   split into one `{field: {op: v}}` clause each
/// - partial / foreign: self-contained bodies, every key must be structural
/// - field: several fields split into one clause per field
///
/// `enclosing` is the nearest key above this mapping that gives an operator
/// body its meaning. Multiset elements are always independent clauses.
///
pub(super) fn expand_implicit_conjunction(
    node: &FilterNode,
    enclosing: Option<&Key>,
) -> Result<FilterNode, NormalizeError> {
    match node {
        FilterNode::Scalar(_) => Ok(node.clone()),
        FilterNode::Mapping(map) => expand_mapping(map, enclosing),
        FilterNode::Multiset(set) => Ok(independent_clauses(set)?.into()),
        FilterNode::Sequence(_) => Err(sequence_fault()),
    }
}

fn expand_mapping(map: &Mapping, enclosing: Option<&Key>) -> Result<FilterNode, NormalizeError> {
    let Some((first, _)) = map.first() else {
        return Ok(map.clone().into());
    };

    match first {
        Key::Operator(op) => match op.category() {
            OperatorCategory::Logical | OperatorCategory::Structural => {
                self_contained(map, op.category())
            }
            OperatorCategory::Comparison => comparison(map, enclosing),
        },
        Key::Field(_) if map.len() == 1 => single_field(map),
        Key::Field(_) => several_fields(map),
    }
}

// Logical and structural bodies never inherit an enclosing key.
fn self_contained(map: &Mapping, category: OperatorCategory) -> Result<FilterNode, NormalizeError> {
    require_category(map, category)?;

    Ok(map
        .try_map_values(|value| expand_implicit_conjunction(value, None))?
        .into())
}

fn comparison(map: &Mapping, enclosing: Option<&Key>) -> Result<FilterNode, NormalizeError> {
    require_category(map, OperatorCategory::Comparison)?;

    if map.len() == 1 {
        let Some((key, value)) = map.first() else {
            return Ok(map.clone().into());
        };

        return Ok(match enclosing {
            // keep the field association when the body sits one level below it
            Some(field @ Key::Field(_)) => FilterNode::entry(
                field.clone(),
                FilterNode::entry(key.clone(), expand_implicit_conjunction(value, Some(key))?),
            ),
            _ => FilterNode::entry(key.clone(), expand_implicit_conjunction(value, None)?),
        });
    }

    let Some(enclosing) = enclosing else {
        return Err(NormalizeError::MissingFieldContext {
            operators: map.key_names(),
        });
    };

    let mut clauses = Multiset::new();
    for (key, value) in map.iter() {
        let body = FilterNode::entry(key.clone(), expand_implicit_conjunction(value, Some(key))?);
        clauses.insert(FilterNode::entry(enclosing.clone(), body));
    }

    Ok(FilterNode::entry(Operator::And, clauses))
}

fn single_field(map: &Mapping) -> Result<FilterNode, NormalizeError> {
    let Some((key, value)) = map.first() else {
        return Ok(map.clone().into());
    };

    match value {
        // the inner mapping decides whether the field is re-attached
        FilterNode::Mapping(_) => expand_implicit_conjunction(value, Some(key)),
        FilterNode::Multiset(set) => Ok(FilterNode::entry(key.clone(), independent_clauses(set)?)),
        FilterNode::Scalar(_) => Ok(map.clone().into()),
        FilterNode::Sequence(_) => Err(sequence_fault()),
    }
}

fn several_fields(map: &Mapping) -> Result<FilterNode, NormalizeError> {
    if map.keys().any(Key::is_operator) {
        return Err(mixed_keys(map));
    }

    let mut clauses = Multiset::new();
    for (key, value) in map.iter() {
        let clause = match value {
            FilterNode::Mapping(_) => expand_implicit_conjunction(value, Some(key))?,
            FilterNode::Multiset(set) => FilterNode::entry(key.clone(), independent_clauses(set)?),
            FilterNode::Sequence(_) => return Err(sequence_fault()),
            FilterNode::Scalar(_) => FilterNode::entry(key.clone(), value.clone()),
        };
        clauses.insert(clause);
    }

    Ok(FilterNode::entry(Operator::And, clauses))
}

fn independent_clauses(set: &Multiset) -> Result<Multiset, NormalizeError> {
    set.try_map(|element| expand_implicit_conjunction(element, None))
}

fn require_category(map: &Mapping, category: OperatorCategory) -> Result<(), NormalizeError> {
    let uniform = map
        .keys()
        .all(|key| key.operator().is_some_and(|op| op.category() == category));

    if uniform { Ok(()) } else { Err(mixed_keys(map)) }
}

fn mixed_keys(map: &Mapping) -> NormalizeError {
    NormalizeError::InvalidMixedKeys {
        keys: map.key_names(),
    }
}

const fn sequence_fault() -> NormalizeError {
    NormalizeError::InvalidStructure {
        pass: Pass::ExpandImplicitConjunction,
    }
}
