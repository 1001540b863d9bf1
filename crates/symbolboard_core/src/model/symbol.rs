//! Symbol domain model.
//!
//! # Responsibility
//! - Define the canonical catalog record and its identity key.
//! - Define the raw volume document shape consumed by the loader.
//!
//! # Invariants
//! - Identity is `(volume, slug)`; the same `slug` may repeat across volumes.
//! - `volume` is assigned by the loader, never read from a volume document.
//! - Missing or `null` tags decode to an empty tag list.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Integer id of one independently loadable volume (`1..=N`).
pub type VolumeId = u32;

/// Returns whether `volume` is inside the addressable volume range.
pub fn is_valid_volume_id(volume: VolumeId) -> bool {
    volume >= 1
}

/// Globally unique identity of one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolKey {
    pub volume: VolumeId,
    pub slug: String,
}

impl SymbolKey {
    pub fn new(volume: VolumeId, slug: impl Into<String>) -> Self {
        Self {
            volume,
            slug: slug.into(),
        }
    }
}

impl Display for SymbolKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.volume, self.slug)
    }
}

/// Canonical catalog record for one pictographic symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Display title; also the word appended to a phrase on selection.
    pub title: String,
    /// Original asset file name, extension included.
    pub file_name: String,
    /// Volume-local identifier.
    pub slug: String,
    /// Single fixed classification.
    pub category: String,
    /// Free-form labels in document order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Owning volume, assigned at load time.
    pub volume: VolumeId,
    /// Opaque date string carried through from the volume document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_on: Option<String>,
}

impl Symbol {
    /// Returns the `(volume, slug)` identity key.
    pub fn key(&self) -> SymbolKey {
        SymbolKey::new(self.volume, self.slug.as_str())
    }

    /// Returns whether this symbol carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}

/// One item as it appears in a volume document, before volume tagging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeItem {
    pub title: String,
    pub file_name: String,
    pub slug: String,
    pub category: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub added_on: Option<String>,
}

impl VolumeItem {
    /// Tags this item with its owning volume.
    pub fn into_symbol(self, volume: VolumeId) -> Symbol {
        Symbol {
            title: self.title,
            file_name: self.file_name,
            slug: self.slug,
            category: self.category,
            tags: self.tags.unwrap_or_default(),
            volume,
            added_on: self.added_on,
        }
    }
}

/// Raw per-volume document: `{ "items": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDocument {
    pub items: Vec<VolumeItem>,
}

impl VolumeDocument {
    /// Parses a raw JSON volume document.
    ///
    /// # Errors
    /// - Returns the decoder error when the text is not a valid document.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Converts every item into a symbol owned by `volume`, preserving order.
    pub fn into_symbols(self, volume: VolumeId) -> Vec<Symbol> {
        self.items
            .into_iter()
            .map(|item| item.into_symbol(volume))
            .collect()
    }
}
