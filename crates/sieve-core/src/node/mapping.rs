use crate::{
    node::{FilterNode, Key},
    vocab::Operator,
};

///
/// Mapping
///
/// Ordered, unique-keyed entries. Insertion order is kept because the first
/// entry decides how the normalizer reads the mapping, and the validator
/// threads field context from earlier entries to later ones.
///
/// Equality ignores entry order: two mappings are equal when they hold the
/// same keys bound to equal values.
///

#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: Vec<(Key, FilterNode)>,
}

impl Mapping {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Build a one-entry mapping.
    #[must_use]
    pub fn single(key: impl Into<Key>, value: impl Into<FilterNode>) -> Self {
        Self {
            entries: vec![(key.into(), value.into())],
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry. An existing key keeps its position and gets the
    /// new value; the previous value is returned.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<FilterNode>) -> Option<FilterNode> {
        let key = key.into();
        let value = value.into();

        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }

        self.entries.push((key, value));

        None
    }

    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&FilterNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn operator(&self, op: Operator) -> Option<&FilterNode> {
        self.entries
            .iter()
            .find(|(k, _)| k.operator() == Some(op))
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FilterNode> {
        self.entries
            .iter()
            .find(|(k, _)| k.field_name().is_some_and(|f| f.as_str() == name))
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn first(&self) -> Option<(&Key, &FilterNode)> {
        self.entries.first().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &FilterNode)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Key spellings in entry order, for diagnostics.
    #[must_use]
    pub fn key_names(&self) -> Vec<String> {
        self.keys().map(|k| k.as_str().to_string()).collect()
    }

    /// Rebuild the mapping with every value passed through `f`, keys and
    /// order unchanged. Stops at the first error.
    pub fn try_map_values<E>(
        &self,
        mut f: impl FnMut(&FilterNode) -> Result<FilterNode, E>,
    ) -> Result<Self, E> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            entries.push((key.clone(), f(value)?));
        }

        Ok(Self { entries })
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for Mapping {}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<Key>,
    V: Into<FilterNode>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }

        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (Key, FilterNode);
    type IntoIter = std::vec::IntoIter<(Key, FilterNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
