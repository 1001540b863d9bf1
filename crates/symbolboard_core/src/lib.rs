//! Catalog and phrase-composition core for the symbol board.
//! This crate is the single source of truth for catalog invariants.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;

pub use assets::{asset_path, fallback_image_path, image_path, thumbnail_path, AssetVariant};
pub use catalog::audit::{audit_documents, audit_source, DuplicateReport};
pub use catalog::index::{CatalogIndex, MergeSummary};
pub use catalog::loader::{LoadOutcome, LoadTicket, VolumeLoadError, VolumeLoader, VolumeStatus};
pub use catalog::source::{
    cache_key, CacheError, FsVolumeSource, MemoryVolumeCache, SourceError, VolumeCache,
    VolumeSource,
};
pub use config::{
    AssetConfig, ConfigError, DisplaySettings, SessionConfig, SettingsError, SettingsPatch,
    SpeechSettings,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::category::{is_known_category, CategoryFilter, ALL_CATEGORY, KNOWN_CATEGORIES};
pub use model::symbol::{Symbol, SymbolKey, VolumeDocument, VolumeId, VolumeItem};
pub use search::grouping::{group_symbols, GroupingMode, SymbolGroup};
pub use search::query::{filter_symbols, locale_cmp, SortKey, SymbolQuery, UsageStats};
pub use service::phrase_composer::{ChannelSpeechSink, PhraseComposer, SpeechRequest, SpeechSink};
pub use service::session::{Session, SessionCollaborators, SessionId};
pub use service::usage_tracker::UsageTracker;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
