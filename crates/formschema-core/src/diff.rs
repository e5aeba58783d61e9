//! Keyed list diffing.
//!
//! Matches elements of two lists by a caller-supplied key instead of by
//! position, so reordering a list never looks like an edit.
//!
//! # Classification
//!
//! For every element of `new`:
//! - key present in `old` and the two elements are identical: **unmodified**
//! - key present in `old` but the element changed: **modified** (`old: Some`)
//! - key absent from `old`: **modified** as an addition (`old: None`)
//!
//! Elements of `old` whose key no longer appears in `new` are **removed**.
//!
//! Keys must be unique within each list. With duplicates the later element
//! wins and earlier ones are neither reported nor removed.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A changed or added element, paired with its previous version if any.
#[derive(Debug)]
pub struct Change<'a, T, K> {
    pub key: K,
    pub old: Option<&'a T>,
    pub new: &'a T,
}

/// Result of [`diff_by_key`].
#[derive(Debug)]
pub struct ListDiff<'a, T, K> {
    pub unmodified: Vec<(K, &'a T)>,
    pub modified: Vec<Change<'a, T, K>>,
    pub removed: Vec<(K, &'a T)>,
}

impl<T, K> ListDiff<'_, T, K> {
    /// True when nothing was added, changed, or removed.
    pub fn is_unchanged(&self) -> bool {
        self.modified.is_empty() && self.removed.is_empty()
    }
}

/// Diff two lists by key.
///
/// `same` decides whether an old and a new element with the same key count as
/// unchanged. Results follow the order of `new`; `removed` follows `old`.
pub fn diff_by_key<'a, T, K, F, S>(old: &'a [T], new: &'a [T], key_of: F, same: S) -> ListDiff<'a, T, K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
    S: Fn(&T, &T) -> bool,
{
    let old_keyed: Vec<(K, &T)> = old.iter().map(|item| (key_of(item), item)).collect();
    let old_by_key: HashMap<&K, &T> = old_keyed.iter().map(|(k, item)| (k, *item)).collect();

    let mut new_keys: HashSet<K> = HashSet::with_capacity(new.len());
    let mut unmodified = Vec::new();
    let mut modified = Vec::new();

    for item in new {
        let key = key_of(item);
        match old_by_key.get(&key) {
            Some(&previous) if same(previous, item) => unmodified.push((key.clone(), item)),
            previous => modified.push(Change {
                key: key.clone(),
                old: previous.copied(),
                new: item,
            }),
        }
        new_keys.insert(key);
    }

    let removed = old_keyed
        .iter()
        .filter(|(k, _)| !new_keys.contains(k))
        .map(|(k, item)| (k.clone(), *item))
        .collect();

    ListDiff {
        unmodified,
        modified,
        removed,
    }
}
