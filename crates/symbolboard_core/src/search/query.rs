//! Pure filter-and-sort query over catalog symbols.
//!
//! # Responsibility
//! - Map `(symbols, category, tags, search text, sort key)` to an ordered result.
//! - Hold the query state manipulated by filter events (tag toggles, search).
//!
//! # Invariants
//! - Stages run in order: re-dedup, category, tags, search, sort.
//! - Nothing is reordered before the sort stage; sorts are stable.
//! - The query never mutates its inputs, so results may be memoized on them.

use crate::model::category::CategoryFilter;
use crate::model::symbol::{Symbol, SymbolKey};
use log::error;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Locale-aware ascending title.
    #[default]
    Alphabetical,
    /// Ascending category, then ascending title.
    Category,
    /// Most recently used first; never-used symbols keep filter order after them.
    Recent,
    /// Highest use count first; ties keep filter order.
    Frequent,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "alphabetical" => Some(Self::Alphabetical),
            "category" => Some(Self::Category),
            "recent" => Some(Self::Recent),
            "frequent" => Some(Self::Frequent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::Category => "category",
            Self::Recent => "recent",
            Self::Frequent => "frequent",
        }
    }
}

/// Usage statistics consulted by the `frequent` and `recent` sorts.
///
/// Keys are symbol titles.
pub trait UsageStats {
    fn use_count(&self, key: &str) -> u64;
    /// Sequence number of the latest use; larger is more recent.
    fn last_used(&self, key: &str) -> Option<u64>;
}

/// Filter and sort inputs of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolQuery {
    pub category: CategoryFilter,
    /// Selected tags, combined with OR; empty disables tag filtering.
    pub tags: Vec<String>,
    /// Case-insensitive substring; empty disables text search.
    pub search: String,
    pub sort: SortKey,
}

impl SymbolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` when absent, removes it when present.
    ///
    /// Returns whether the tag is active afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if let Some(position) = self.tags.iter().position(|active| active == tag) {
            self.tags.remove(position);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }
}

/// Runs `query` over `symbols` and returns references in result order.
pub fn filter_symbols<'a>(
    symbols: &'a [Symbol],
    query: &SymbolQuery,
    usage: &dyn UsageStats,
) -> Vec<&'a Symbol> {
    let mut seen: HashSet<SymbolKey> = HashSet::with_capacity(symbols.len());
    let mut results = symbols
        .iter()
        .filter(|symbol| {
            let fresh = seen.insert(symbol.key());
            if !fresh {
                error!(
                    "event=catalog_invariant module=search status=error key={}",
                    symbol.key()
                );
            }
            fresh
        })
        .filter(|symbol| query.category.matches(&symbol.category))
        .filter(|symbol| matches_any_tag(symbol, &query.tags))
        .filter(|symbol| matches_search(symbol, &query.search))
        .collect::<Vec<_>>();

    sort_symbols(&mut results, query.sort, usage);
    results
}

/// Locale-style title comparison.
///
/// Base letters decide first (accents and case ignored), then accents with
/// unaccented first, then case with lowercase first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn base_letters(value: &str) -> String {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

fn matches_any_tag(symbol: &Symbol, active_tags: &[String]) -> bool {
    active_tags.is_empty() || active_tags.iter().any(|tag| symbol.has_tag(tag))
}

fn matches_search(symbol: &Symbol, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    symbol.title.to_lowercase().contains(&needle)
        || symbol
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(&needle))
}

fn sort_symbols(results: &mut [&Symbol], sort: SortKey, usage: &dyn UsageStats) {
    match sort {
        SortKey::Alphabetical => results.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
        SortKey::Category => results.sort_by(|a, b| {
            locale_cmp(&a.category, &b.category).then_with(|| locale_cmp(&a.title, &b.title))
        }),
        SortKey::Frequent => results.sort_by_key(|symbol| Reverse(usage.use_count(&symbol.title))),
        SortKey::Recent => results.sort_by_key(|symbol| Reverse(usage.last_used(&symbol.title))),
    }
}
