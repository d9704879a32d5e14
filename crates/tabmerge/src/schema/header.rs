//! Column-name normalization and the deduplicated output header.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Normalized form of a column name: trimmed, then lowercased.
///
/// Two column names refer to the same column exactly when their keys are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(String);

impl ColumnKey {
    /// Normalize a column name.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered column names, unique under [`ColumnKey`] comparison.
///
/// The first spelling of a column wins; later spellings that normalize to
/// the same key resolve to the existing position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnifiedHeader {
    names: Vec<String>,
    positions: HashMap<ColumnKey, usize>,
}

impl UnifiedHeader {
    /// Create an empty header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a header from names, collapsing case/whitespace duplicates.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut header = Self::new();
        for name in names {
            header.insert(name);
        }
        header
    }

    /// Add `name` unless an equivalent column exists. Returns its position
    /// and whether it was newly added.
    pub fn insert(&mut self, name: &str) -> (usize, bool) {
        let key = ColumnKey::new(name);
        if let Some(&position) = self.positions.get(&key) {
            return (position, false);
        }
        let position = self.names.len();
        self.names.push(name.to_string());
        self.positions.insert(key, position);
        (position, true)
    }

    /// Add a column that must not merge with an existing one. If `name` is
    /// taken, ` (2)`, ` (3)`, ... is appended until it is free.
    pub fn insert_distinct(&mut self, name: &str) -> usize {
        let (position, added) = self.insert(name);
        if added {
            return position;
        }
        let mut n = 2;
        loop {
            let (position, added) = self.insert(&format!("{name} ({n})"));
            if added {
                return position;
            }
            n += 1;
        }
    }

    /// Position of the column equivalent to `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.position_of(&ColumnKey::new(name))
    }

    /// Position of the column with the given key.
    pub fn position_of(&self, key: &ColumnKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// True if a column equivalent to `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Column names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over column names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Consume the header, returning the names.
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

impl Serialize for UnifiedHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.names)
    }
}
