use super::*;
use chrono::NaiveDate;

fn text(s: &str) -> FilterNode {
    FilterNode::from(s)
}

#[test]
fn key_parse_classifies_operators_and_fields() {
    assert_eq!(Key::parse("gte"), Key::Operator(Operator::Gte));
    assert_eq!(Key::parse("year"), Key::Field(FieldName::new("year")));
    // operator spellings are case-sensitive
    assert_eq!(Key::parse("AND"), Key::Field(FieldName::new("AND")));
}

#[test]
fn mapping_equality_ignores_entry_order() {
    let a: Mapping = [("a", 1), ("b", 2)].into_iter().collect();
    let b: Mapping = [("b", 2), ("a", 1)].into_iter().collect();

    assert_eq!(a, b);
}

#[test]
fn mapping_insert_replaces_in_place() {
    let mut map: Mapping = [("a", 1), ("b", 2)].into_iter().collect();
    let previous = map.insert("a", 3);

    assert_eq!(previous, Some(FilterNode::from(1)));
    assert_eq!(map.key_names(), vec!["a", "b"]);
    assert_eq!(map.field("a"), Some(&FilterNode::from(3)));
}

#[test]
fn mapping_with_different_values_is_not_equal() {
    let a = Mapping::single("a", 1);
    let b = Mapping::single("a", 2);
    let c = Mapping::single("b", 1);

    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn multiset_deduplicates_structurally() {
    let set: Multiset = [
        FilterNode::entry("title", "Alien"),
        FilterNode::entry("title", "Alien"),
        FilterNode::entry("title", "Heat"),
    ]
    .into_iter()
    .collect();

    assert_eq!(set.len(), 2);
}

#[test]
fn multiset_equality_ignores_order() {
    let a = Multiset::from_vec(vec![text("x"), text("y")]);
    let b = Multiset::from_vec(vec![text("y"), text("x"), text("y")]);

    assert_eq!(a, b);
}

#[test]
fn multiset_keeps_first_seen_order() {
    let set = Multiset::from_vec(vec![text("b"), text("a"), text("b")]);
    let order: Vec<_> = set.iter().cloned().collect();

    assert_eq!(order, vec![text("b"), text("a")]);
}

#[test]
fn int_and_float_never_compare_equal() {
    let float = Float64::try_new(1.0).map(Scalar::from);

    assert_ne!(Some(Scalar::Int(1)), float);
}

#[test]
fn float_rejects_non_finite_and_canonicalizes_zero() {
    assert!(Float64::try_new(f64::NAN).is_none());
    assert!(Float64::try_new(f64::INFINITY).is_none());
    assert_eq!(Float64::try_new(-0.0), Float64::try_new(0.0));
}

#[test]
fn lift_sequences_dedups_recursively() {
    let raw = FilterNode::entry(
        Operator::Or,
        FilterNode::Sequence(vec![
            FilterNode::entry("x", FilterNode::Sequence(vec![text("a"), text("a")])),
            FilterNode::entry("x", FilterNode::Sequence(vec![text("a")])),
        ]),
    );

    let lifted = raw.lift_sequences();
    let expected = FilterNode::or([FilterNode::entry(
        "x",
        Multiset::from_vec(vec![text("a")]),
    )]);

    assert_eq!(lifted, expected);
}

#[test]
fn display_renders_json_in_entry_order() {
    let date = NaiveDate::from_ymd_opt(1999, 12, 31).map(Scalar::from);
    let mut map = Mapping::new();
    map.insert("title", "Heat");
    map.insert("released", date.map_or(FilterNode::Scalar(Scalar::Null), FilterNode::from));
    map.insert(Operator::And, Multiset::from_vec(vec![FilterNode::from(1)]));

    assert_eq!(
        FilterNode::from(map).to_string(),
        r#"{"title":"Heat","released":"1999-12-31","and":[1]}"#
    );
}

#[test]
fn node_kinds() {
    assert_eq!(text("a").kind(), NodeKind::Scalar);
    assert_eq!(FilterNode::entry("a", 1).kind(), NodeKind::Mapping);
    assert_eq!(FilterNode::Multiset(Multiset::new()).kind(), NodeKind::Multiset);
    assert_eq!(FilterNode::Sequence(Vec::new()).kind(), NodeKind::Sequence);
    assert!(!text("a").is_composite());
    assert!(FilterNode::Sequence(Vec::new()).is_composite());
}
