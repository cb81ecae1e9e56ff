use crate::{
    schema::{DatasetSchema, FieldDef, FieldType, SchemaRegistry},
    vocab::Operator,
};

pub(crate) fn car() -> DatasetSchema {
    DatasetSchema::new("car")
        .foreign("person")
        .field("make", FieldDef::new(FieldType::Text))
        .field("model", FieldDef::new(FieldType::Text))
        .field("year", FieldDef::new(FieldType::Int).min(1886.0))
        .field("value", FieldDef::new(FieldType::Number).min(0.0))
}

pub(crate) fn cars() -> DatasetSchema {
    DatasetSchema::new("cars")
        .field("make", FieldDef::new(FieldType::Text))
        .field("model", FieldDef::new(FieldType::Text))
        .field("year", FieldDef::new(FieldType::Int))
        .field("value", FieldDef::new(FieldType::Number))
}

pub(crate) fn person() -> DatasetSchema {
    DatasetSchema::new("person")
        .field("name", FieldDef::new(FieldType::Text).min_len(1))
        .field(
            "gender",
            FieldDef::new(FieldType::Text).one_of(["female", "male", "other"]),
        )
        .field("age", FieldDef::new(FieldType::Int).min(0.0).max(150.0))
        .field("cars", FieldDef::new(FieldType::Int).min(0.0))
}

pub(crate) fn animal() -> DatasetSchema {
    DatasetSchema::new("animal")
        .foreign("person")
        .field("name", FieldDef::new(FieldType::Text))
        .field("gender", FieldDef::new(FieldType::Text))
        .field("age", FieldDef::new(FieldType::Int))
        .field("type", FieldDef::new(FieldType::Text))
}

pub(crate) fn movie() -> DatasetSchema {
    DatasetSchema::new("movie")
        .field("title", FieldDef::new(FieldType::Text))
        .field("rating", FieldDef::new(FieldType::Float).min(0.0).max(10.0))
        .field("description", FieldDef::new(FieldType::Text).max_len(280))
        .field("earnings", FieldDef::new(FieldType::Int))
        .field("released", FieldDef::new(FieldType::Date))
}

// a dataset with restricted operators, dataset-wide and per field
pub(crate) fn movies() -> DatasetSchema {
    DatasetSchema::new("movies")
        .operators([Operator::And, Operator::Or, Operator::In, Operator::Eq])
        .field(
            "name",
            FieldDef::new(FieldType::Text).operators([Operator::In, Operator::Eq]),
        )
        .field("year", FieldDef::new(FieldType::Int).operators([Operator::Eq]))
}

pub(crate) fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    for schema in [car(), cars(), person(), animal(), movie(), movies()] {
        registry.register(schema).expect("fixture datasets are unique");
    }
    registry.set_default("movies").expect("movies is registered");

    registry
}
