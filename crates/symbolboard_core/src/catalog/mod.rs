//! Catalog ingestion and indexing.
//!
//! # Responsibility
//! - Fetch, tag and merge per-volume documents into one in-memory catalog.
//! - Derive category and tag vocabularies from merged symbols.
//!
//! # Invariants
//! - The catalog holds at most one symbol per `(volume, slug)`.
//! - Final catalog content does not depend on volume load order.

pub mod audit;
pub mod index;
pub mod loader;
pub mod source;
