//! Index declarations.
//!
//! An index is a named, ordered tuple of field names a storage layer may
//! optimize lookups for. Declarations accept either a single field name or a
//! sequence of names; both normalize to an [`IndexKey`].

/// Normalized index key: the ordered field names forming the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey(Vec<String>);

impl IndexKey {
    /// The key's field names, in order.
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Consume into the field names.
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for IndexKey {
    fn from(field: &str) -> Self {
        IndexKey(vec![field.to_string()])
    }
}

impl From<String> for IndexKey {
    fn from(field: String) -> Self {
        IndexKey(vec![field])
    }
}

impl<const N: usize> From<[&str; N]> for IndexKey {
    fn from(fields: [&str; N]) -> Self {
        IndexKey(fields.iter().map(|f| f.to_string()).collect())
    }
}

impl From<&[&str]> for IndexKey {
    fn from(fields: &[&str]) -> Self {
        IndexKey(fields.iter().map(|f| f.to_string()).collect())
    }
}

impl From<Vec<&str>> for IndexKey {
    fn from(fields: Vec<&str>) -> Self {
        IndexKey(fields.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for IndexKey {
    fn from(fields: Vec<String>) -> Self {
        IndexKey(fields)
    }
}
