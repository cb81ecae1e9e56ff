use crate::schema::{Schema, SchemaView};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("unknown dataset '{name}'")]
    UnknownSchema { name: String },

    #[error("dataset '{name}' is already registered")]
    DuplicateSchema { name: String },

    #[error("dataset '{schema}' declares unknown foreign '{foreign}'")]
    UnknownForeign { schema: String, foreign: String },

    #[error("no default dataset is configured")]
    NoDefaultSchema,
}

///
/// SchemaRegistry
///
/// Owns every schema by name. Built once, before any filter is checked,
/// and passed explicitly to whatever needs it.
///

#[derive(Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Box<dyn Schema>>,
    default: Option<String>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its own name. The first schema registered
    /// becomes the default unless one is set explicitly.
    pub fn register(&mut self, schema: impl Schema + 'static) -> Result<(), RegistryError> {
        self.register_boxed(Box::new(schema))
    }

    pub fn register_boxed(&mut self, schema: Box<dyn Schema>) -> Result<(), RegistryError> {
        let name = schema.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateSchema { name });
        }

        tracing::debug!(dataset = %name, "registered dataset");

        if self.default.is_none() {
            self.default = Some(name.clone());
        }
        self.schemas.insert(name, schema);

        Ok(())
    }

    pub fn set_default(&mut self, name: &str) -> Result<(), RegistryError> {
        if !self.schemas.contains_key(name) {
            return Err(RegistryError::UnknownSchema {
                name: name.to_string(),
            });
        }
        self.default = Some(name.to_string());

        Ok(())
    }

    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Schema> {
        self.schemas.get(name).map(Box::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Resolve a dataset and its immediate foreigns.
    pub fn view(&self, name: &str) -> Result<SchemaView<'_>, RegistryError> {
        let root = self.get(name).ok_or_else(|| RegistryError::UnknownSchema {
            name: name.to_string(),
        })?;

        let mut foreigns = Vec::with_capacity(root.foreigns().len());
        for foreign in root.foreigns() {
            let schema = self
                .get(foreign)
                .ok_or_else(|| RegistryError::UnknownForeign {
                    schema: name.to_string(),
                    foreign: foreign.clone(),
                })?;
            foreigns.push(schema);
        }

        Ok(SchemaView::new(root, foreigns))
    }

    pub fn default_view(&self) -> Result<SchemaView<'_>, RegistryError> {
        let name = self.default.as_deref().ok_or(RegistryError::NoDefaultSchema)?;

        self.view(name)
    }

    /// Check that every declared foreign resolves.
    pub fn check(&self) -> Result<(), RegistryError> {
        for name in self.schemas.keys() {
            self.view(name)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.schemas.keys().collect::<Vec<_>>())
            .field("default", &self.default)
            .finish()
    }
}
