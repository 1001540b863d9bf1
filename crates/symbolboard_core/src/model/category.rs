//! Category vocabulary.
//!
//! # Invariants
//! - `All` is a synthetic wildcard, never a real symbol category.
//! - Category matching is exact and case-sensitive.

/// Label of the wildcard category that matches every symbol.
pub const ALL_CATEGORY: &str = "All";

/// Fixed, ordered list of known categories (wildcard excluded).
pub const KNOWN_CATEGORIES: [&str; 19] = [
    "Everyday Life",
    "Animals",
    "Food & Drink",
    "Places & Structures",
    "Nature & Outdoors",
    "Vehicles & Transport",
    "Work & Industry",
    "Technology & Media",
    "Entertainment & Leisure",
    "Sports",
    "Fashion & Style",
    "Health & Wellness",
    "Fantasy & Imagination",
    "History & Culture",
    "Space & Science",
    "Countries",
    "Events",
    "Hobbies",
    "Professions",
];

/// Returns whether `name` is part of the fixed enumeration.
pub fn is_known_category(name: &str) -> bool {
    KNOWN_CATEGORIES.contains(&name)
}

/// Active category selection used by queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Matches every symbol regardless of its category value.
    #[default]
    All,
    /// Matches symbols whose category equals this value exactly.
    Named(String),
}

impl CategoryFilter {
    /// Maps a UI label to a filter; only the exact label `All` is the wildcard.
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORY {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORY,
            Self::Named(name) => name.as_str(),
        }
    }
}
