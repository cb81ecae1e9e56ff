use crate::node::FilterNode;

///
/// Multiset
///
/// Unordered collection deduplicated by structural equality. Iteration
/// follows first-seen insertion order so diagnostics are deterministic,
/// but equality ignores order.
///

#[derive(Clone, Debug, Default)]
pub struct Multiset(Vec<FilterNode>);

impl Multiset {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a multiset, discarding later duplicates.
    #[must_use]
    pub fn from_vec(values: Vec<FilterNode>) -> Self {
        let mut set = Self(Vec::with_capacity(values.len()));
        for value in values {
            set.insert(value);
        }

        set
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, value: &FilterNode) -> bool {
        self.0.iter().any(|existing| existing == value)
    }

    /// Insert a value, returning `true` if it was newly inserted.
    pub fn insert(&mut self, value: FilterNode) -> bool {
        if self.contains(&value) {
            return false;
        }

        self.0.push(value);

        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterNode> {
        self.0.iter()
    }

    /// Map every element through `f`. Elements that become equal after
    /// mapping collapse into one.
    pub fn try_map<E>(
        &self,
        mut f: impl FnMut(&FilterNode) -> Result<FilterNode, E>,
    ) -> Result<Self, E> {
        let mut out = Self(Vec::with_capacity(self.0.len()));
        for value in &self.0 {
            out.insert(f(value)?);
        }

        Ok(out)
    }
}

impl PartialEq for Multiset {
    fn eq(&self, other: &Self) -> bool {
        // both sides are deduplicated, so equal length plus containment is set equality
        self.len() == other.len() && self.0.iter().all(|value| other.contains(value))
    }
}

impl Eq for Multiset {}

impl FromIterator<FilterNode> for Multiset {
    fn from_iter<I: IntoIterator<Item = FilterNode>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }

        set
    }
}

impl IntoIterator for Multiset {
    type Item = FilterNode;
    type IntoIter = std::vec::IntoIter<FilterNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Multiset {
    type Item = &'a FilterNode;
    type IntoIter = std::slice::Iter<'a, FilterNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
