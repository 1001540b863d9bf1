//! Domain model for the symbol catalog.
//!
//! # Responsibility
//! - Define canonical data structures used by catalog, query and session code.
//! - Define the wire shape of per-volume documents.
//!
//! # Invariants
//! - Every symbol is identified by a stable `(volume, slug)` key.
//! - Symbols are never removed once merged into a catalog.

pub mod category;
pub mod symbol;
