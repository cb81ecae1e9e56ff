//! Dataset definitions from TOML.
//!
//! ```toml
//! default = "car"
//!
//! [datasets.car]
//! foreigns = ["person"]
//!
//! [datasets.car.fields.year]
//! type = "int"
//! operators = ["eq", "gte", "lte"]
//! min = 1886
//! ```
#![warn(unreachable_pub)]

#[cfg(test)]
mod tests;

use serde::Deserialize;
use sieve_core::{
    node::{Float64, Scalar},
    schema::{DatasetSchema, FieldDef, FieldType, RegistryError, SchemaRegistry},
    vocab::Operator,
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("dataset '{dataset}': field '{field}' has unknown type '{ty}'")]
    UnknownFieldType {
        dataset: String,
        field: String,
        ty: String,
    },

    #[error("dataset '{dataset}': unknown operator '{op}'")]
    UnknownOperator { dataset: String, op: String },

    #[error("dataset '{dataset}': invalid field name '{field}': {reason}")]
    InvalidFieldName {
        dataset: String,
        field: String,
        reason: &'static str,
    },

    #[error("dataset '{dataset}': field '{field}': {reason}")]
    InvalidConstraint {
        dataset: String,
        field: String,
        reason: String,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Dataset used when a request names none. Defaults to the first
    /// dataset in name order.
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetConfig>,
}

///
/// DatasetConfig
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    #[serde(default)]
    pub foreigns: Vec<String>,

    /// Dataset-wide operator set; the whole vocabulary when absent.
    #[serde(default)]
    pub operators: Option<Vec<String>>,

    #[serde(default)]
    pub fields: BTreeMap<String, FieldConfig>,
}

///
/// FieldConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    #[serde(rename = "type", default = "default_field_type")]
    pub ty: String,

    #[serde(default)]
    pub operators: Option<Vec<String>>,

    #[serde(default)]
    pub one_of: Vec<toml::Value>,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub min_len: Option<usize>,

    #[serde(default)]
    pub max_len: Option<usize>,
}

fn default_field_type() -> String {
    FieldType::Any.as_str().to_string()
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = text.parse()?;
        tracing::debug!(
            path = %path.display(),
            datasets = config.datasets.len(),
            "loaded dataset config"
        );

        Ok(config)
    }

    /// Compile every dataset into a checked registry.
    pub fn into_registry(self) -> Result<SchemaRegistry, ConfigError> {
        let mut registry = SchemaRegistry::new();

        for (name, dataset) in &self.datasets {
            registry.register(dataset.to_schema(name)?)?;
        }

        if let Some(default) = &self.default {
            registry.set_default(default)?;
        }
        registry.check()?;

        Ok(registry)
    }
}

/// Load a config file straight into a registry.
pub fn load_registry(path: impl AsRef<Path>) -> Result<SchemaRegistry, ConfigError> {
    Config::load(path)?.into_registry()
}

impl DatasetConfig {
    fn to_schema(&self, name: &str) -> Result<DatasetSchema, ConfigError> {
        let mut schema = DatasetSchema::new(name);

        if let Some(ops) = &self.operators {
            schema = schema.operators(parse_operators(name, ops)?);
        }
        for foreign in &self.foreigns {
            schema = schema.foreign(foreign.as_str());
        }
        for (field, config) in &self.fields {
            check_field_name(name, field)?;
            schema = schema.field(field.as_str(), config.to_field_def(name, field)?);
        }

        Ok(schema)
    }
}

impl FieldConfig {
    fn to_field_def(&self, dataset: &str, field: &str) -> Result<FieldDef, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidConstraint {
            dataset: dataset.to_string(),
            field: field.to_string(),
            reason,
        };

        let ty = FieldType::lookup(&self.ty).ok_or_else(|| ConfigError::UnknownFieldType {
            dataset: dataset.to_string(),
            field: field.to_string(),
            ty: self.ty.clone(),
        })?;

        let mut def = FieldDef::new(ty);

        if let Some(ops) = &self.operators {
            def = def.operators(parse_operators(dataset, ops)?);
        }

        if (self.min.is_some() || self.max.is_some()) && !ty.is_numeric() {
            return Err(invalid(format!("numeric bounds on a {ty} field")));
        }
        if (self.min_len.is_some() || self.max_len.is_some()) && ty != FieldType::Text {
            return Err(invalid(format!("length bounds on a {ty} field")));
        }
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(invalid(format!("min {min} is greater than max {max}")));
        }
        if let (Some(min), Some(max)) = (self.min_len, self.max_len)
            && min > max
        {
            return Err(invalid(format!("min_len {min} is greater than max_len {max}")));
        }

        def.constraints.min = self.min;
        def.constraints.max = self.max;
        def.constraints.min_len = self.min_len;
        def.constraints.max_len = self.max_len;
        def.constraints.one_of = self
            .one_of
            .iter()
            .map(|value| {
                scalar(value)
                    .ok_or_else(|| invalid(format!("one_of entry {value} is not a scalar")))
            })
            .collect::<Result<_, _>>()?;

        Ok(def)
    }
}

fn parse_operators(dataset: &str, names: &[String]) -> Result<Vec<Operator>, ConfigError> {
    names
        .iter()
        .map(|name| {
            name.parse::<Operator>()
                .map_err(|_| ConfigError::UnknownOperator {
                    dataset: dataset.to_string(),
                    op: name.clone(),
                })
        })
        .collect()
}

fn check_field_name(dataset: &str, field: &str) -> Result<(), ConfigError> {
    let reason = if field.is_empty() {
        "field name is empty"
    } else if Operator::lookup(field).is_some() {
        "field name spells an operator"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidFieldName {
        dataset: dataset.to_string(),
        field: field.to_string(),
        reason,
    })
}

// dates stay text; date fields accept ISO text
fn scalar(value: &toml::Value) -> Option<Scalar> {
    match value {
        toml::Value::String(s) => Some(Scalar::text(s.as_str())),
        toml::Value::Integer(i) => Some(Scalar::Int(*i)),
        toml::Value::Float(f) => Float64::try_new(*f).map(Scalar::Float),
        toml::Value::Boolean(b) => Some(Scalar::Bool(*b)),
        toml::Value::Datetime(d) => Some(Scalar::text(d.to_string())),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
