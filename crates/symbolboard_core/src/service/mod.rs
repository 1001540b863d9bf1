//! Core use-case services.
//!
//! # Responsibility
//! - Own phrase composition and usage counting.
//! - Compose catalog, query, phrase and usage state into one session context.

pub mod phrase_composer;
pub mod session;
pub mod usage_tracker;
