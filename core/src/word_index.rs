//! Key → word list index (`keys2word`).
//!
//! Unlike [`KeyPhraseIndex`](crate::KeyPhraseIndex) this index keeps every
//! registration: the same word may appear several times under a key, and each
//! occurrence is a separate selectable candidate.

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Read-only key → words index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyWordIndex {
    map: BTreeMap<String, Vec<String>>,
}

impl KeyWordIndex {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.map.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Keys starting with `prefix`, in alphabetical order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.map
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Append-only builder for [`KeyWordIndex`].
#[derive(Debug, Default)]
pub struct KeyWordIndexBuilder {
    map: BTreeMap<String, Vec<String>>,
}

impl KeyWordIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<K: Into<String>, W: Into<String>>(&mut self, key: K, word: W) {
        self.map.entry(key.into()).or_default().push(word.into());
    }

    pub fn build(self) -> KeyWordIndex {
        KeyWordIndex { map: self.map }
    }
}
