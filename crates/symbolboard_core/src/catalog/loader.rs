//! Volume loading with idempotence and an in-flight guard.
//!
//! # Responsibility
//! - Turn fetched volume documents into catalog merges, exactly once per volume.
//! - Expose every load attempt as an observable [`LoadOutcome`].
//!
//! # Invariants
//! - A loaded volume is never fetched or merged again.
//! - At most one load per volume is in flight; duplicates are suppressed.
//! - Failed loads leave the catalog untouched and stay retryable.
//! - A ticket issued before `reset` never merges; its load is stale.
//! - Merge and mark-loaded happen in one step (see `CatalogIndex::merge_volume`).

use crate::catalog::index::{CatalogIndex, MergeSummary};
use crate::catalog::source::{cache_key, SourceError, VolumeCache, VolumeSource};
use crate::model::symbol::{is_valid_volume_id, VolumeDocument, VolumeId};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a volume load did not merge anything.
#[derive(Debug)]
pub enum VolumeLoadError {
    /// Volume ids start at 1.
    InvalidVolumeId(VolumeId),
    /// The source could not deliver the document.
    Fetch(SourceError),
    /// The document was delivered but is malformed.
    Parse {
        volume: VolumeId,
        source: serde_json::Error,
    },
}

impl Display for VolumeLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidVolumeId(volume) => write!(f, "invalid volume id: {volume}"),
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Parse { volume, source } => {
                write!(f, "malformed volume {volume} document: {source}")
            }
        }
    }
}

impl Error for VolumeLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidVolumeId(_) => None,
            Self::Fetch(err) => Some(err),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<SourceError> for VolumeLoadError {
    fn from(value: SourceError) -> Self {
        Self::Fetch(value)
    }
}

impl VolumeLoadError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidVolumeId(_) => "invalid_volume_id",
            Self::Fetch(SourceError::NotFound(_)) => "not_found",
            Self::Fetch(_) => "fetch_failed",
            Self::Parse { .. } => "malformed_document",
        }
    }
}

/// Observable result of one load request.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The volume was fetched and merged.
    Loaded(MergeSummary),
    /// The volume was already loaded; nothing happened.
    AlreadyLoaded,
    /// Another load of the same volume has not completed yet.
    InFlight,
    /// The ticket was superseded by a reset; the fetched document was dropped.
    Stale,
    /// Nothing was merged; the volume remains retryable.
    Failed(VolumeLoadError),
}

impl LoadOutcome {
    /// Whether the volume is loaded after this request.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::AlreadyLoaded)
    }

    pub fn error(&self) -> Option<&VolumeLoadError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Per-volume load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeStatus {
    NotLoaded,
    Loading,
    Loaded,
    /// Last attempt failed with this message.
    Failed(String),
}

/// Proof that a load of `volume` was started and must be completed.
#[derive(Debug)]
#[must_use = "a started load stays in flight until it is completed"]
pub struct LoadTicket {
    volume: VolumeId,
    generation: u64,
}

impl LoadTicket {
    pub fn volume(&self) -> VolumeId {
        self.volume
    }
}

/// Load bookkeeping: in-flight guard and last failure per volume.
#[derive(Debug, Default)]
pub struct VolumeLoader {
    /// Bumped by `reset`; tickets from older generations are stale.
    generation: u64,
    in_flight: BTreeSet<VolumeId>,
    failures: BTreeMap<VolumeId, String>,
}

impl VolumeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load of `volume`.
    ///
    /// Returns a ticket when the caller should fetch now, or the outcome that
    /// makes the fetch unnecessary (already loaded, in flight, invalid id).
    pub fn begin(
        &mut self,
        catalog: &CatalogIndex,
        volume: VolumeId,
    ) -> Result<LoadTicket, LoadOutcome> {
        if !is_valid_volume_id(volume) {
            let err = VolumeLoadError::InvalidVolumeId(volume);
            warn!(
                "event=volume_load module=catalog status=error volume={} reason={}",
                volume,
                err.code()
            );
            return Err(LoadOutcome::Failed(err));
        }
        if catalog.is_volume_loaded(volume) {
            debug!(
                "event=volume_load module=catalog status=skipped volume={} reason=already_loaded",
                volume
            );
            return Err(LoadOutcome::AlreadyLoaded);
        }
        if !self.in_flight.insert(volume) {
            debug!(
                "event=volume_load module=catalog status=skipped volume={} reason=in_flight",
                volume
            );
            return Err(LoadOutcome::InFlight);
        }

        Ok(LoadTicket {
            volume,
            generation: self.generation,
        })
    }

    /// Completes a started load with the fetch result.
    ///
    /// On success the volume is merged, marked loaded, and written through to
    /// `cache` when one is provided.
    pub fn complete(
        &mut self,
        catalog: &mut CatalogIndex,
        cache: Option<&dyn VolumeCache>,
        ticket: LoadTicket,
        fetched: Result<String, SourceError>,
    ) -> LoadOutcome {
        let volume = ticket.volume;
        if ticket.generation != self.generation || !self.in_flight.remove(&volume) {
            debug!(
                "event=volume_load module=catalog status=skipped volume={} reason=stale_ticket",
                volume
            );
            return LoadOutcome::Stale;
        }

        if catalog.is_volume_loaded(volume) {
            return LoadOutcome::AlreadyLoaded;
        }

        let raw = match fetched {
            Ok(raw) => raw,
            Err(err) => return self.fail(volume, VolumeLoadError::Fetch(err)),
        };
        let document = match VolumeDocument::from_json_str(&raw) {
            Ok(document) => document,
            Err(source) => return self.fail(volume, VolumeLoadError::Parse { volume, source }),
        };

        let summary = catalog.merge_volume(volume, document.into_symbols(volume));
        self.failures.remove(&volume);
        info!(
            "event=volume_load module=catalog status=ok volume={} added={} skipped={} total={}",
            volume,
            summary.added,
            summary.skipped_duplicates,
            catalog.len()
        );

        if let Some(cache) = cache {
            if let Err(err) = cache.store(&cache_key(volume), &raw) {
                warn!(
                    "event=volume_cache_write module=catalog status=error volume={} error={}",
                    volume, err
                );
            }
        }

        LoadOutcome::Loaded(summary)
    }

    /// Fetches and merges `volume` in one call.
    pub fn load(
        &mut self,
        catalog: &mut CatalogIndex,
        source: &dyn VolumeSource,
        cache: Option<&dyn VolumeCache>,
        volume: VolumeId,
    ) -> LoadOutcome {
        let ticket = match self.begin(catalog, volume) {
            Ok(ticket) => ticket,
            Err(outcome) => return outcome,
        };
        let fetched = source.fetch(volume);
        self.complete(catalog, cache, ticket, fetched)
    }

    pub fn is_in_flight(&self, volume: VolumeId) -> bool {
        self.in_flight.contains(&volume)
    }

    pub fn status(&self, catalog: &CatalogIndex, volume: VolumeId) -> VolumeStatus {
        if catalog.is_volume_loaded(volume) {
            VolumeStatus::Loaded
        } else if self.in_flight.contains(&volume) {
            VolumeStatus::Loading
        } else if let Some(message) = self.failures.get(&volume) {
            VolumeStatus::Failed(message.clone())
        } else {
            VolumeStatus::NotLoaded
        }
    }

    /// Forgets in-flight markers and recorded failures.
    ///
    /// Tickets issued before the reset complete as [`LoadOutcome::Stale`].
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight.clear();
        self.failures.clear();
    }

    fn fail(&mut self, volume: VolumeId, err: VolumeLoadError) -> LoadOutcome {
        error!(
            "event=volume_load module=catalog status=error volume={} reason={}",
            volume,
            err.code()
        );
        self.failures.insert(volume, err.to_string());
        LoadOutcome::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadOutcome, VolumeLoadError, VolumeLoader, VolumeStatus};
    use crate::catalog::index::CatalogIndex;
    use crate::catalog::source::SourceError;

    const ONE_ITEM: &str = r#"{"items":[{"title":"Apple","file_name":"apple.png","slug":"apple","category":"Food & Drink","tags":["fruit"]}]}"#;

    #[test]
    fn second_begin_for_same_volume_is_suppressed() {
        let catalog = CatalogIndex::new();
        let mut loader = VolumeLoader::new();

        let ticket = loader.begin(&catalog, 1).expect("first begin should start");
        let second = loader.begin(&catalog, 1);
        assert!(matches!(second, Err(LoadOutcome::InFlight)));
        assert_eq!(loader.status(&catalog, 1), VolumeStatus::Loading);

        let other = loader.begin(&catalog, 2);
        assert!(other.is_ok(), "different volumes load independently");
        assert_eq!(ticket.volume(), 1);
    }

    #[test]
    fn failure_clears_in_flight_and_keeps_volume_retryable() {
        let mut catalog = CatalogIndex::new();
        let mut loader = VolumeLoader::new();

        let ticket = loader.begin(&catalog, 3).expect("begin");
        let outcome = loader.complete(&mut catalog, None, ticket, Err(SourceError::NotFound(3)));
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(VolumeLoadError::Fetch(SourceError::NotFound(3)))
        ));
        assert!(!loader.is_in_flight(3));
        assert!(matches!(loader.status(&catalog, 3), VolumeStatus::Failed(_)));

        let retry = loader.begin(&catalog, 3).expect("failed volume must be retryable");
        let outcome = loader.complete(&mut catalog, None, retry, Ok(ONE_ITEM.to_string()));
        assert!(outcome.is_loaded());
        assert_eq!(loader.status(&catalog, 3), VolumeStatus::Loaded);
    }

    #[test]
    fn malformed_document_is_reported_as_parse_error() {
        let mut catalog = CatalogIndex::new();
        let mut loader = VolumeLoader::new();

        let ticket = loader.begin(&catalog, 1).expect("begin");
        let outcome = loader.complete(&mut catalog, None, ticket, Ok("{\"items\":".to_string()));
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(VolumeLoadError::Parse { volume: 1, .. })
        ));
        assert!(catalog.is_empty());
        assert!(!catalog.is_volume_loaded(1));
    }

    #[test]
    fn ticket_from_before_reset_does_not_merge() {
        let mut catalog = CatalogIndex::new();
        let mut loader = VolumeLoader::new();
        let old = r#"{"items":[{"title":"Old","file_name":"old.png","slug":"old","category":"Other","tags":[]}]}"#;
        let new = r#"{"items":[{"title":"New","file_name":"new.png","slug":"new","category":"Other","tags":[]}]}"#;

        let stale = loader.begin(&catalog, 1).expect("begin before reset");
        catalog.clear();
        loader.reset();
        let fresh = loader.begin(&catalog, 1).expect("begin after reset");

        let outcome = loader.complete(&mut catalog, None, stale, Ok(old.to_string()));
        assert!(matches!(outcome, LoadOutcome::Stale));
        assert!(catalog.is_empty());
        assert_eq!(loader.status(&catalog, 1), VolumeStatus::Loading);

        let outcome = loader.complete(&mut catalog, None, fresh, Ok(new.to_string()));
        assert!(matches!(outcome, LoadOutcome::Loaded(summary) if summary.added == 1));
        let titles = catalog
            .symbols()
            .iter()
            .map(|symbol| symbol.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["New"]);
    }

    #[test]
    fn volume_zero_is_rejected_before_fetch() {
        let catalog = CatalogIndex::new();
        let mut loader = VolumeLoader::new();
        let outcome = loader.begin(&catalog, 0);
        assert!(matches!(
            outcome,
            Err(LoadOutcome::Failed(VolumeLoadError::InvalidVolumeId(0)))
        ));
    }
}
