use super::*;
use crate::{
    node::{Float64, Mapping, Scalar},
    test_fixtures,
};
use chrono::NaiveDate;

fn type_errors(schema: &dyn Schema, value: impl Into<FilterNode>, field: &str) -> Vec<String> {
    let mut errors = Vec::new();
    schema.validate_type(&value.into(), field, &mut errors);
    errors
}

fn value_errors(schema: &dyn Schema, value: impl Into<FilterNode>, field: &str) -> Vec<String> {
    let mut errors = Vec::new();
    schema.validate_value(&value.into(), field, &mut errors);
    errors
}

// ---------------------------------------------------------------------
// FieldType
// ---------------------------------------------------------------------

#[test]
fn field_types_round_trip_through_their_names() {
    for ty in FieldType::ALL {
        assert_eq!(FieldType::lookup(ty.as_str()), Some(ty));
    }
    assert_eq!(FieldType::lookup("string"), None);
}

#[test]
fn float_fields_accept_integers_but_int_fields_reject_floats() {
    let half = Float64::try_new(0.5).map(Scalar::Float).expect("finite");

    assert!(FieldType::Float.accepts(&Scalar::Int(3)));
    assert!(FieldType::Number.accepts(&half));
    assert!(!FieldType::Int.accepts(&half));
}

#[test]
fn date_fields_accept_dates_and_iso_text() {
    let date = NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid date");

    assert!(FieldType::Date.accepts(&Scalar::Date(date)));
    assert!(FieldType::Date.accepts(&Scalar::text("2015-01-01")));
    assert!(!FieldType::Date.accepts(&Scalar::text("January 1st")));
}

#[test]
fn only_any_accepts_null() {
    for ty in FieldType::ALL {
        assert_eq!(ty.accepts(&Scalar::Null), ty == FieldType::Any, "type {ty}");
    }
}

// ---------------------------------------------------------------------
// DatasetSchema
// ---------------------------------------------------------------------

#[test]
fn type_mismatch_is_reported_once() {
    let car = test_fixtures::car();

    assert!(type_errors(&car, 2010, "year").is_empty());
    assert_eq!(type_errors(&car, "2010", "year").len(), 1);
    assert_eq!(type_errors(&car, Mapping::new(), "year").len(), 1);
}

#[test]
fn value_constraints_are_checked() {
    let person = test_fixtures::person();

    assert!(value_errors(&person, 30, "age").is_empty());
    assert_eq!(value_errors(&person, -1, "age").len(), 1);
    assert_eq!(value_errors(&person, 200, "age").len(), 1);
    assert!(value_errors(&person, "female", "gender").is_empty());
    assert_eq!(value_errors(&person, "robot", "gender").len(), 1);
    assert_eq!(value_errors(&person, "", "name").len(), 1);
}

#[test]
fn one_of_compares_numbers_by_value() {
    let schema = DatasetSchema::new("scores")
        .field("score", FieldDef::new(FieldType::Number).one_of([1, 2]));
    let one = Float64::try_new(1.0).expect("finite");
    let half = Float64::try_new(1.5).expect("finite");

    assert!(value_errors(&schema, 1, "score").is_empty());
    assert!(value_errors(&schema, Scalar::Float(one), "score").is_empty());
    assert_eq!(value_errors(&schema, Scalar::Float(half), "score").len(), 1);
    assert_eq!(value_errors(&schema, "1", "score").len(), 1);
}

#[test]
fn per_field_operator_rules_apply_to_comparisons_only() {
    let movies = test_fixtures::movies();
    let mut errors = Vec::new();

    movies.validate_operator(Operator::Eq, Some("name"), &mut errors);
    movies.validate_operator(Operator::And, Some("name"), &mut errors);
    movies.validate_operator(Operator::Lt, None, &mut errors);
    assert!(errors.is_empty());

    movies.validate_operator(Operator::In, Some("year"), &mut errors);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("'in'"));
}

#[test]
fn datasets_default_to_the_whole_vocabulary() {
    let car = test_fixtures::car();

    assert!(Operator::ALL.into_iter().all(|op| car.has_operator(op)));
    assert!(!test_fixtures::movies().has_operator(Operator::Gte));
}

// ---------------------------------------------------------------------
// SchemaView
// ---------------------------------------------------------------------

#[test]
fn view_unions_immediate_foreigns() {
    let registry = test_fixtures::registry();
    let view = registry.view("car").expect("car resolves");

    assert!(view.has_field("make"));
    assert!(view.has_field("age"));
    assert!(!view.has_field("title"));
    assert_eq!(view.owner("age").map(Schema::name), Some("person"));
}

#[test]
fn view_is_not_transitive() {
    let mut registry = SchemaRegistry::new();
    registry
        .register(DatasetSchema::new("a").foreign("b"))
        .expect("register a");
    registry
        .register(DatasetSchema::new("b").foreign("c"))
        .expect("register b");
    registry
        .register(DatasetSchema::new("c").field("deep", FieldDef::new(FieldType::Int)))
        .expect("register c");

    let view = registry.view("a").expect("a resolves");

    assert!(!view.has_field("deep"));
    assert!(registry.view("b").expect("b resolves").has_field("deep"));
}

#[test]
fn view_dispatches_checks_to_the_owning_schema() {
    let registry = test_fixtures::registry();
    let view = registry.view("car").expect("car resolves");
    let mut errors = Vec::new();

    view.validate_value(&FilterNode::from(-5), "age", &mut errors);

    assert_eq!(errors.len(), 1);
}

// ---------------------------------------------------------------------
// SchemaRegistry
// ---------------------------------------------------------------------

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = SchemaRegistry::new();
    registry.register(test_fixtures::car()).expect("first");

    assert_eq!(
        registry.register(test_fixtures::car()),
        Err(RegistryError::DuplicateSchema {
            name: "car".to_string()
        })
    );
}

#[test]
fn unknown_names_and_foreigns_are_errors() {
    let mut registry = SchemaRegistry::new();
    registry.register(test_fixtures::car()).expect("car");

    assert!(matches!(
        registry.view("boat"),
        Err(RegistryError::UnknownSchema { .. })
    ));
    assert_eq!(
        registry.check(),
        Err(RegistryError::UnknownForeign {
            schema: "car".to_string(),
            foreign: "person".to_string(),
        })
    );

    registry.register(test_fixtures::person()).expect("person");
    assert_eq!(registry.check(), Ok(()));
}

#[test]
fn first_registered_schema_is_the_default() {
    let mut registry = SchemaRegistry::new();
    assert!(matches!(
        registry.default_view(),
        Err(RegistryError::NoDefaultSchema)
    ));

    registry.register(test_fixtures::cars()).expect("cars");
    registry.register(test_fixtures::movie()).expect("movie");
    assert_eq!(registry.default_name(), Some("cars"));

    registry.set_default("movie").expect("movie exists");
    assert_eq!(
        registry.default_view().map(|view| view.name()),
        Ok("movie")
    );
    assert!(registry.set_default("boat").is_err());
}
