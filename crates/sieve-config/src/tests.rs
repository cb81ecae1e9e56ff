use super::*;
use sieve_core::{node::FilterNode, schema::Schema, session::Session};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/datasets.toml");

fn registry(text: &str) -> Result<SchemaRegistry, ConfigError> {
    text.parse::<Config>()?.into_registry()
}

#[test]
fn fixture_loads_into_a_checked_registry() {
    let registry = load_registry(FIXTURE).expect("fixture loads");

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["car", "movies", "person"]
    );
    assert_eq!(registry.default_name(), Some("car"));

    let view = registry.view("car").expect("car resolves");
    assert!(view.has_field("age"));
    assert!(view.has_foreign("person"));
}

#[test]
fn loaded_datasets_validate_filters() {
    let registry = load_registry(FIXTURE).expect("fixture loads");
    let session = Session::new(&registry);

    let outcome = session
        .check(None, r#"{"year": {"start": 2001, "end": 2005}}"#)
        .expect("evaluated");
    assert!(outcome.is_accepted());

    let outcome = session
        .check(Some("person"), r#"{"gender": "robot"}"#)
        .expect("evaluated");
    assert!(!outcome.is_accepted());

    let outcome = session
        .check(Some("movies"), r#"{"year": {"in": [1999]}}"#)
        .expect("evaluated");
    assert!(!outcome.is_accepted());
}

#[test]
fn missing_file_reports_its_path() {
    let err = Config::load("/nonexistent/sieve.toml").expect_err("missing file");

    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/sieve.toml"));
}

#[test]
fn empty_config_is_an_empty_registry() {
    let registry = registry("").expect("empty config");

    assert!(registry.is_empty());
    assert_eq!(registry.default_name(), None);
}

#[test]
fn default_falls_back_to_first_name() {
    let registry = registry(
        r#"
        [datasets.zebra]
        [datasets.alpha]
        "#,
    )
    .expect("valid config");

    assert_eq!(registry.default_name(), Some("alpha"));
}

#[test]
fn field_type_defaults_to_any() {
    let registry = registry(
        r#"
        [datasets.loose.fields.anything]
        "#,
    )
    .expect("valid config");
    let schema = registry.get("loose").expect("registered");

    let mut messages = Vec::new();
    schema.validate_type(&FilterNode::from("x"), "anything", &mut messages);
    schema.validate_type(&FilterNode::from(3), "anything", &mut messages);
    assert!(messages.is_empty());
}

#[test]
fn one_of_accepts_mixed_scalars() {
    let registry = registry(
        r#"
        [datasets.d.fields.level]
        one_of = [1, 2.5, "max", true]
        "#,
    )
    .expect("valid config");
    let schema = registry.get("d").expect("registered");

    let mut messages = Vec::new();
    schema.validate_value(&FilterNode::from("max"), "level", &mut messages);
    assert!(messages.is_empty());

    schema.validate_value(&FilterNode::from("min"), "level", &mut messages);
    assert_eq!(messages.len(), 1);
}

#[test]
fn numeric_one_of_matches_integers_and_floats() {
    let registry = registry(
        r#"
        [datasets.d.fields.rating]
        type = "float"
        one_of = [1, 2.5]
        "#,
    )
    .expect("valid config");
    let schema = registry.get("d").expect("registered");

    let mut messages = Vec::new();
    let one = Float64::try_new(1.0).expect("finite");
    schema.validate_value(&FilterNode::from(Scalar::Float(one)), "rating", &mut messages);
    schema.validate_value(&FilterNode::from(1), "rating", &mut messages);
    assert!(messages.is_empty());
}

#[test]
fn unknown_keys_are_rejected() {
    let err = registry(
        r#"
        [datasets.d]
        foreign = ["x"]
        "#,
    )
    .expect_err("typo");

    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn unknown_field_type_is_rejected() {
    let err = registry(
        r#"
        [datasets.d.fields.f]
        type = "decimal"
        "#,
    )
    .expect_err("bad type");

    assert!(matches!(err, ConfigError::UnknownFieldType { ref ty, .. } if ty == "decimal"));
}

#[test]
fn unknown_operator_is_rejected() {
    let err = registry(
        r#"
        [datasets.d]
        operators = ["and", "like"]
        "#,
    )
    .expect_err("bad operator");

    assert!(matches!(err, ConfigError::UnknownOperator { ref op, .. } if op == "like"));
}

#[test]
fn field_named_after_an_operator_is_rejected() {
    let err = registry(
        r#"
        [datasets.d.fields.between]
        type = "int"
        "#,
    )
    .expect_err("reserved name");

    assert!(matches!(err, ConfigError::InvalidFieldName { ref field, .. } if field == "between"));
}

#[test]
fn constraints_must_fit_the_field_type() {
    let err = registry(
        r#"
        [datasets.d.fields.f]
        type = "text"
        min = 1
        "#,
    )
    .expect_err("numeric bound on text");
    assert!(matches!(err, ConfigError::InvalidConstraint { .. }));

    let err = registry(
        r#"
        [datasets.d.fields.f]
        type = "int"
        min = 10
        max = 1
        "#,
    )
    .expect_err("inverted bounds");
    assert!(err.to_string().contains("greater than"));

    let err = registry(
        r#"
        [datasets.d.fields.f]
        one_of = [[1, 2]]
        "#,
    )
    .expect_err("array member");
    assert!(matches!(err, ConfigError::InvalidConstraint { .. }));
}

#[test]
fn unresolved_foreign_fails_the_registry_check() {
    let err = registry(
        r#"
        [datasets.car]
        foreigns = ["person"]
        "#,
    )
    .expect_err("dangling foreign");

    assert!(matches!(
        err,
        ConfigError::Registry(RegistryError::UnknownForeign { .. })
    ));
}

#[test]
fn unknown_default_is_rejected() {
    let err = registry(
        r#"
        default = "boat"
        [datasets.car]
        "#,
    )
    .expect_err("bad default");

    assert!(matches!(
        err,
        ConfigError::Registry(RegistryError::UnknownSchema { .. })
    ));
}
