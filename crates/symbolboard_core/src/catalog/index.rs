//! In-memory catalog index.
//!
//! # Responsibility
//! - Own the deduplicated, insertion-ordered symbol collection.
//! - Maintain the derived tag vocabulary and the loaded-volume set.
//!
//! # Invariants
//! - No two stored symbols share `(volume, slug)`; first-seen wins.
//! - The tag vocabulary always equals the union of stored symbol tags, sorted.
//! - A volume is marked loaded in the same step that merges its symbols.

use crate::model::category::{is_known_category, ALL_CATEGORY, KNOWN_CATEGORIES};
use crate::model::symbol::{Symbol, SymbolKey, VolumeId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Counts produced by one volume merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Symbols appended to the catalog.
    pub added: usize,
    /// Items dropped because their key was already present.
    pub skipped_duplicates: usize,
}

/// Append-only symbol catalog plus derived vocabularies.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    symbols: Vec<Symbol>,
    /// Key to position in `symbols`.
    positions: HashMap<SymbolKey, usize>,
    tags: BTreeSet<String>,
    loaded_volumes: BTreeSet<VolumeId>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the items of one volume and marks the volume loaded.
    ///
    /// Every item is re-tagged with `volume`. Items whose key already exists,
    /// in the catalog or earlier in the same batch, are dropped.
    pub(crate) fn merge_volume(&mut self, volume: VolumeId, items: Vec<Symbol>) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for mut symbol in items {
            symbol.volume = volume;
            let key = symbol.key();
            if self.positions.contains_key(&key) {
                summary.skipped_duplicates += 1;
                continue;
            }
            self.positions.insert(key, self.symbols.len());
            self.tags.extend(symbol.tags.iter().cloned());
            self.symbols.push(symbol);
            summary.added += 1;
        }

        self.loaded_volumes.insert(volume);
        summary
    }

    /// All symbols in insertion order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, key: &SymbolKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn get(&self, key: &SymbolKey) -> Option<&Symbol> {
        self.positions
            .get(key)
            .and_then(|position| self.symbols.get(*position))
    }

    /// Symbols whose category equals `category`; `All` returns every symbol.
    pub fn symbols_in_category(&self, category: &str) -> Vec<&Symbol> {
        self.symbols
            .iter()
            .filter(|symbol| category == ALL_CATEGORY || symbol.category == category)
            .collect()
    }

    /// Category vocabulary: `All`, the fixed list, then any other present
    /// category in sorted order.
    pub fn categories(&self) -> Vec<String> {
        let extra = self
            .symbols
            .iter()
            .map(|symbol| symbol.category.as_str())
            .filter(|category| *category != ALL_CATEGORY && !is_known_category(category))
            .collect::<BTreeSet<_>>();

        let mut categories = Vec::with_capacity(1 + KNOWN_CATEGORIES.len() + extra.len());
        categories.push(ALL_CATEGORY.to_string());
        categories.extend(KNOWN_CATEGORIES.iter().map(|name| name.to_string()));
        categories.extend(extra.into_iter().map(str::to_string));
        categories
    }

    /// Tag vocabulary in lexicographic order.
    pub fn tags(&self) -> Vec<&str> {
        self.tags.iter().map(String::as_str).collect()
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn is_volume_loaded(&self, volume: VolumeId) -> bool {
        self.loaded_volumes.contains(&volume)
    }

    /// Loaded volume ids in ascending order.
    pub fn loaded_volumes(&self) -> Vec<VolumeId> {
        self.loaded_volumes.iter().copied().collect()
    }

    /// Checks the key-uniqueness invariant over stored symbols.
    ///
    /// Returns the first repeated key when the invariant is broken.
    pub fn verify_unique_keys(&self) -> Result<(), SymbolKey> {
        let mut seen = HashSet::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let key = symbol.key();
            if !seen.insert(key.clone()) {
                return Err(key);
            }
        }
        Ok(())
    }

    /// Drops every symbol, tag and loaded-volume marker.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.positions.clear();
        self.tags.clear();
        self.loaded_volumes.clear();
    }
}
