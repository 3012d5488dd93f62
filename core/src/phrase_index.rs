//! Key → numbered phrase index (`key2ph`).
//!
//! Every key owns a short list of [`SlotEntry`] values. Slot numbers are the
//! numbers a user types after a key to pick a phrase, so the list of one key
//! never holds the same slot twice and is always sorted by slot.
//!
//! The index is assembled with [`KeyPhraseIndexBuilder`], which applies the
//! registration policy used when several word files define the same key:
//!
//! - an unnumbered phrase already present under the key is ignored;
//! - an unnumbered new phrase takes the smallest free slot;
//! - a numbered phrase claims its slot, moving a different occupant to the
//!   smallest free slot, and moving itself if it was registered elsewhere.
//!
//! Nothing registered is ever dropped. Once built, a [`KeyPhraseIndex`] has no
//! mutating methods.

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Bound;

/// One numbered phrase under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotEntry {
    pub slot: u32,
    pub phrase: String,
}

impl SlotEntry {
    pub fn new<T: Into<String>>(slot: u32, phrase: T) -> Self {
        Self {
            slot,
            phrase: phrase.into(),
        }
    }
}

/// Smallest positive slot number not used in `entries`.
pub fn smallest_free_slot(entries: &[SlotEntry]) -> u32 {
    let mut slot = 1;
    while entries.iter().any(|e| e.slot == slot) {
        slot += 1;
    }
    slot
}

/// Position of the entry holding exactly `phrase`, if any.
pub fn position_of_phrase(entries: &[SlotEntry], phrase: &str) -> Option<usize> {
    entries.iter().position(|e| e.phrase == phrase)
}

/// Apply one registration to a single key's entry list.
///
/// Returns `false` when the registration was a no-op.
pub fn register_entry(entries: &mut Vec<SlotEntry>, requested: Option<u32>, phrase: &str) -> bool {
    let changed = match requested {
        None => {
            if position_of_phrase(entries, phrase).is_some() {
                return false;
            }
            let slot = smallest_free_slot(entries);
            entries.push(SlotEntry::new(slot, phrase));
            true
        }
        Some(slot) => {
            if let Some(pos) = position_of_phrase(entries, phrase) {
                if entries[pos].slot == slot {
                    return false;
                }
                entries.remove(pos);
            }
            if let Some(occupant) = entries.iter().position(|e| e.slot == slot) {
                let free = smallest_free_slot(entries);
                entries[occupant].slot = free;
            }
            entries.push(SlotEntry::new(slot, phrase));
            true
        }
    };
    entries.sort_by_key(|e| e.slot);
    changed
}

/// Read-only key → numbered phrases index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyPhraseIndex {
    map: BTreeMap<String, Vec<SlotEntry>>,
}

impl KeyPhraseIndex {
    /// Entries registered under `key`, sorted by slot.
    pub fn get(&self, key: &str) -> Option<&[SlotEntry]> {
        self.map.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Phrase stored under `key` at `slot`.
    pub fn phrase(&self, key: &str, slot: u32) -> Option<&str> {
        self.get(key)?
            .iter()
            .find(|e| e.slot == slot)
            .map(|e| e.phrase.as_str())
    }

    /// All keys in alphabetical order with their entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SlotEntry])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Keys starting with `prefix`, in alphabetical order.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [SlotEntry])> + 'a {
        self.map
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Total number of phrases across all keys.
    pub fn entry_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}

/// Incremental builder for [`KeyPhraseIndex`].
#[derive(Debug, Default)]
pub struct KeyPhraseIndexBuilder {
    map: BTreeMap<String, Vec<SlotEntry>>,
}

impl KeyPhraseIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `phrase` under `key`, optionally at an explicit slot.
    ///
    /// Returns `false` if the index is unchanged (duplicate registration).
    pub fn register<K: Into<String>>(&mut self, key: K, requested: Option<u32>, phrase: &str) -> bool {
        let entries = self.map.entry(key.into()).or_default();
        register_entry(entries, requested, phrase)
    }

    pub fn get(&self, key: &str) -> Option<&[SlotEntry]> {
        self.map.get(key).map(Vec::as_slice)
    }

    pub fn build(self) -> KeyPhraseIndex {
        KeyPhraseIndex { map: self.map }
    }
}
