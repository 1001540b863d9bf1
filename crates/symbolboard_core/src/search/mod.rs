//! Query entry points over the in-memory catalog.
//!
//! # Responsibility
//! - Provide the pure filter/sort pipeline used by every listing.
//! - Provide result grouping for glossary-style views.

pub mod grouping;
pub mod query;
