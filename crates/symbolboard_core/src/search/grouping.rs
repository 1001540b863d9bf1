//! Grouping of query results for glossary-style listings.

use crate::model::symbol::Symbol;
use crate::search::query::UsageStats;
use std::collections::BTreeMap;

const UNCATEGORIZED_LABEL: &str = "Uncategorized";
const UNTAGGED_LABEL: &str = "No Tags";
const UNTITLED_LABEL: &str = "#";

// (label, tier size); the last tier takes the remainder.
const FREQUENCY_TIERS: [(&str, usize); 3] = [
    ("Most Used", 20),
    ("Frequently Used", 30),
    ("Sometimes Used", 50),
];
const FREQUENCY_REST_LABEL: &str = "All Others";

/// How to partition a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// By uppercased first character of the title.
    Alphabetical,
    Category,
    /// A symbol appears once under each of its tags.
    Tags,
    /// Fixed-size usage tiers, most used first.
    Frequency,
}

/// One labelled group, members in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolGroup<'a> {
    pub label: String,
    pub symbols: Vec<&'a Symbol>,
}

/// Partitions `symbols` by `mode`.
///
/// Groups are sorted by label, except frequency tiers which stay in tier
/// order. Empty groups are never returned.
pub fn group_symbols<'a>(
    symbols: &[&'a Symbol],
    mode: GroupingMode,
    usage: &dyn UsageStats,
) -> Vec<SymbolGroup<'a>> {
    match mode {
        GroupingMode::Alphabetical => group_by_label(symbols, |symbol| {
            let label = symbol
                .title
                .chars()
                .next()
                .map(|first| first.to_uppercase().collect::<String>())
                .unwrap_or_else(|| UNTITLED_LABEL.to_string());
            vec![label]
        }),
        GroupingMode::Category => group_by_label(symbols, |symbol| {
            if symbol.category.is_empty() {
                vec![UNCATEGORIZED_LABEL.to_string()]
            } else {
                vec![symbol.category.clone()]
            }
        }),
        GroupingMode::Tags => group_by_label(symbols, |symbol| {
            if symbol.tags.is_empty() {
                vec![UNTAGGED_LABEL.to_string()]
            } else {
                symbol.tags.clone()
            }
        }),
        GroupingMode::Frequency => group_by_frequency(symbols, usage),
    }
}

fn group_by_label<'a, F>(symbols: &[&'a Symbol], labels_for: F) -> Vec<SymbolGroup<'a>>
where
    F: Fn(&Symbol) -> Vec<String>,
{
    let mut groups: BTreeMap<String, Vec<&'a Symbol>> = BTreeMap::new();
    for symbol in symbols {
        let mut labels = labels_for(symbol);
        labels.sort();
        labels.dedup();
        for label in labels {
            groups.entry(label).or_default().push(*symbol);
        }
    }

    groups
        .into_iter()
        .map(|(label, symbols)| SymbolGroup { label, symbols })
        .collect()
}

fn group_by_frequency<'a>(symbols: &[&'a Symbol], usage: &dyn UsageStats) -> Vec<SymbolGroup<'a>> {
    let mut ranked = symbols.to_vec();
    ranked.sort_by_key(|symbol| std::cmp::Reverse(usage.use_count(&symbol.title)));

    let mut groups = Vec::with_capacity(FREQUENCY_TIERS.len() + 1);
    let mut remaining = ranked.as_slice();
    for (label, size) in FREQUENCY_TIERS {
        let (tier, rest) = remaining.split_at(size.min(remaining.len()));
        groups.push(SymbolGroup {
            label: label.to_string(),
            symbols: tier.to_vec(),
        });
        remaining = rest;
    }
    groups.push(SymbolGroup {
        label: FREQUENCY_REST_LABEL.to_string(),
        symbols: remaining.to_vec(),
    });

    groups.retain(|group| !group.symbols.is_empty());
    groups
}
