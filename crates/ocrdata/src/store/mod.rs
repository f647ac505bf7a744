//! The persisted path → text mapping.
//!
//! A [`Store`] maps a normalized relative image path to the searchable text
//! extracted from it. It is loaded once at the start of a run, mutated in
//! memory, and written back through [`codec::save`] at checkpoints and at the
//! end of the run.
pub mod codec;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use codec::{STORE_PREFIX, STORE_SUFFIX, decode, encode, load, save};

/// In-memory store of extracted text keyed by forward-slash relative path.
///
/// Keys keep the order they were inserted in, so entries loaded from disk are
/// written back in their original order with new entries appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    entries: IndexMap<String, String>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Insert or replace the text for `key`, returning the previous text.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), text.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
