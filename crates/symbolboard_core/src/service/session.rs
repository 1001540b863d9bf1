//! Session context: the composition root of catalog, query, phrase and usage state.
//!
//! # Responsibility
//! - Own every piece of per-session mutable state explicitly.
//! - Translate discrete UI events (symbol tap, filter change, volume load)
//!   into core operations.
//!
//! # Invariants
//! - All mutation goes through `&mut self`; one event is handled at a time.
//! - A fresh or reset session has an empty catalog, empty phrase, zeroed
//!   counters and the default query.
//! - Collaborators are injected; the session holds no global state.

use crate::catalog::index::CatalogIndex;
use crate::catalog::loader::{LoadOutcome, LoadTicket, VolumeLoader, VolumeStatus};
use crate::catalog::source::{SourceError, VolumeCache, VolumeSource};
use crate::config::{
    AssetConfig, ConfigError, DisplaySettings, SessionConfig, SettingsError, SettingsPatch,
};
use crate::model::category::CategoryFilter;
use crate::model::symbol::{Symbol, SymbolKey, VolumeId};
use crate::search::grouping::{group_symbols, GroupingMode, SymbolGroup};
use crate::search::query::{filter_symbols, SortKey, SymbolQuery};
use crate::service::phrase_composer::{PhraseComposer, SpeechSink};
use crate::service::usage_tracker::UsageTracker;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

/// Stable identifier of one session, used to correlate log lines.
pub type SessionId = Uuid;

/// External collaborators wired in by the embedding application.
#[derive(Clone)]
pub struct SessionCollaborators {
    pub source: Arc<dyn VolumeSource>,
    /// Write-through cache; `None` disables caching.
    pub cache: Option<Arc<dyn VolumeCache>>,
    pub speech: Arc<dyn SpeechSink>,
}

/// Per-session state and event handlers.
pub struct Session {
    id: SessionId,
    config: SessionConfig,
    display: DisplaySettings,
    collaborators: SessionCollaborators,
    catalog: CatalogIndex,
    loader: VolumeLoader,
    composer: PhraseComposer,
    usage: UsageTracker,
    query: SymbolQuery,
}

impl Session {
    /// Creates an empty session; `config` is validated first.
    pub fn new(
        config: SessionConfig,
        collaborators: SessionCollaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let composer = PhraseComposer::new(
            Arc::clone(&collaborators.speech),
            config.speech.clone(),
            config.phrase_history_capacity,
        );
        let session = Self {
            id: Uuid::new_v4(),
            display: config.display.clone(),
            config,
            collaborators,
            catalog: CatalogIndex::new(),
            loader: VolumeLoader::new(),
            composer,
            usage: UsageTracker::new(),
            query: SymbolQuery::new(),
        };
        info!(
            "event=session_start module=session status=ok session_id={} volumes={}",
            session.id, session.config.volume_count
        );
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Restores the initial state; configured settings are re-applied.
    pub fn reset(&mut self) {
        self.catalog.clear();
        self.loader.reset();
        self.composer.reset();
        self.composer.set_speech_settings(self.config.speech.clone());
        self.display = self.config.display.clone();
        self.usage.clear();
        self.query = SymbolQuery::new();
        info!(
            "event=session_reset module=session status=ok session_id={}",
            self.id
        );
    }

    // Volume loading.

    /// Fetches and merges one volume synchronously.
    pub fn load_volume(&mut self, volume: VolumeId) -> LoadOutcome {
        self.loader.load(
            &mut self.catalog,
            self.collaborators.source.as_ref(),
            self.collaborators.cache.as_deref(),
            volume,
        )
    }

    /// Loads volumes `1..=volume_count` in order, one outcome per volume.
    pub fn load_all_volumes(&mut self) -> Vec<(VolumeId, LoadOutcome)> {
        (1..=self.config.volume_count)
            .map(|volume| (volume, self.load_volume(volume)))
            .collect()
    }

    /// Starts a load whose fetch happens outside the session.
    pub fn begin_volume_load(&mut self, volume: VolumeId) -> Result<LoadTicket, LoadOutcome> {
        self.loader.begin(&self.catalog, volume)
    }

    /// Delivers the externally fetched document for a started load.
    pub fn complete_volume_load(
        &mut self,
        ticket: LoadTicket,
        fetched: Result<String, SourceError>,
    ) -> LoadOutcome {
        self.loader.complete(
            &mut self.catalog,
            self.collaborators.cache.as_deref(),
            ticket,
            fetched,
        )
    }

    pub fn volume_status(&self, volume: VolumeId) -> VolumeStatus {
        self.loader.status(&self.catalog, volume)
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    // Query state.

    pub fn query(&self) -> &SymbolQuery {
        &self.query
    }

    /// Sets the active category from its UI label (`All` is the wildcard).
    pub fn set_active_category(&mut self, category: &str) {
        self.query.category = CategoryFilter::parse(category);
    }

    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        self.query.toggle_tag(tag)
    }

    pub fn clear_tags(&mut self) {
        self.query.clear_tags();
    }

    pub fn set_search_query(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_sort_key(&mut self, sort: SortKey) {
        self.query.sort = sort;
    }

    /// Current query applied to the catalog.
    pub fn filtered_symbols(&self) -> Vec<&Symbol> {
        filter_symbols(self.catalog.symbols(), &self.query, &self.usage)
    }

    /// Current query result partitioned by `mode`.
    pub fn grouped_symbols(&self, mode: GroupingMode) -> Vec<SymbolGroup<'_>> {
        group_symbols(&self.filtered_symbols(), mode, &self.usage)
    }

    // Phrase and usage.

    /// Symbol tap: append its title to the phrase and count one use.
    pub fn select_symbol(&mut self, symbol: &Symbol) {
        self.select_title(symbol.title.clone());
    }

    /// Symbol tap by identity; returns `false` for a key not in the catalog.
    pub fn select_key(&mut self, key: &SymbolKey) -> bool {
        let Some(title) = self.catalog.get(key).map(|symbol| symbol.title.clone()) else {
            return false;
        };
        self.select_title(title);
        true
    }

    fn select_title(&mut self, title: String) {
        self.usage.record_use(&title);
        self.composer.add_word(title);
    }

    pub fn add_word(&mut self, word: impl Into<String>) {
        self.composer.add_word(word);
    }

    pub fn speak_phrase(&self) -> bool {
        self.composer.speak_phrase()
    }

    pub fn clear_phrase(&mut self) -> bool {
        self.composer.clear()
    }

    pub fn record_use(&mut self, key: &str) -> u64 {
        self.usage.record_use(key)
    }

    pub fn phrase(&self) -> &PhraseComposer {
        &self.composer
    }

    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    // Settings.

    /// Applies a partial settings update; nothing changes when it is invalid.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<(), SettingsError> {
        let (speech, display) = patch.apply_to(self.composer.speech_settings(), &self.display)?;
        self.composer.set_speech_settings(speech);
        self.display = display;
        info!(
            "event=settings_update module=session status=ok session_id={}",
            self.id
        );
        Ok(())
    }

    pub fn display_settings(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn assets(&self) -> &AssetConfig {
        &self.config.assets
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
