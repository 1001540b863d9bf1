//! Offline duplicate audit over raw volume documents.
//!
//! Reports key collisions inside one volume (which the loader drops) and
//! slugs shared between volumes (which are expected and kept).

use crate::catalog::loader::VolumeLoadError;
use crate::catalog::source::VolumeSource;
use crate::model::symbol::{SymbolKey, VolumeDocument, VolumeId};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Findings of one audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Items seen across all audited volumes, duplicates included.
    pub total_items: usize,
    /// Repeated `(volume, slug)` keys, one entry per extra occurrence.
    pub within_volume: Vec<SymbolKey>,
    /// Slugs present in more than one volume, with their sorted volume ids.
    pub cross_volume: BTreeMap<String, Vec<VolumeId>>,
}

impl DuplicateReport {
    /// True when no volume repeats one of its own keys.
    pub fn is_clean(&self) -> bool {
        self.within_volume.is_empty()
    }
}

/// Audits already-decoded volume documents.
pub fn audit_documents<I>(volumes: I) -> DuplicateReport
where
    I: IntoIterator<Item = (VolumeId, VolumeDocument)>,
{
    let mut report = DuplicateReport::default();
    let mut seen_keys = HashSet::new();
    let mut slug_volumes: BTreeMap<String, BTreeSet<VolumeId>> = BTreeMap::new();

    for (volume, document) in volumes {
        for item in document.items {
            report.total_items += 1;
            let key = SymbolKey::new(volume, item.slug.as_str());
            if !seen_keys.insert(key.clone()) {
                report.within_volume.push(key);
            }
            slug_volumes.entry(item.slug).or_default().insert(volume);
        }
    }

    report.cross_volume = slug_volumes
        .into_iter()
        .filter(|(_, volumes)| volumes.len() > 1)
        .map(|(slug, volumes)| (slug, volumes.into_iter().collect()))
        .collect();
    report
}

/// Fetches and audits every volume in `volumes`.
///
/// Volumes that fail to fetch or parse are skipped and returned alongside
/// the report.
pub fn audit_source<I>(
    source: &dyn VolumeSource,
    volumes: I,
) -> (DuplicateReport, Vec<(VolumeId, VolumeLoadError)>)
where
    I: IntoIterator<Item = VolumeId>,
{
    let mut documents = Vec::new();
    let mut failures = Vec::new();

    for volume in volumes {
        let parsed = source
            .fetch(volume)
            .map_err(VolumeLoadError::from)
            .and_then(|raw| {
                VolumeDocument::from_json_str(&raw)
                    .map_err(|source| VolumeLoadError::Parse { volume, source })
            });
        match parsed {
            Ok(document) => documents.push((volume, document)),
            Err(err) => failures.push((volume, err)),
        }
    }

    (audit_documents(documents), failures)
}
