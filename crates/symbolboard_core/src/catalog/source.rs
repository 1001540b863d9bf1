//! Volume fetch and cache collaborator contracts.
//!
//! # Responsibility
//! - Define the seam through which raw volume documents enter the core.
//! - Provide a filesystem source and an in-memory write-through cache.
//!
//! # Invariants
//! - Sources return raw document text; parsing belongs to the loader.
//! - Cache failures never affect catalog state.

use crate::model::symbol::VolumeId;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const VOLUME_DOCUMENT_FILE_NAME: &str = "meta.json";

/// Fetch failure reported by a [`VolumeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No document exists for this volume.
    NotFound(VolumeId),
    /// The document exists but could not be read.
    Io { volume: VolumeId, message: String },
    /// The backing transport is not reachable.
    Unavailable { volume: VolumeId, message: String },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(volume) => write!(f, "volume {volume} document not found"),
            Self::Io { volume, message } => {
                write!(f, "failed to read volume {volume} document: {message}")
            }
            Self::Unavailable { volume, message } => {
                write!(f, "volume {volume} source unavailable: {message}")
            }
        }
    }
}

impl Error for SourceError {}

/// Cache write failure; logged by the loader and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheError {
    pub key: String,
    pub message: String,
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to cache `{}`: {}", self.key, self.message)
    }
}

impl Error for CacheError {}

/// Fetches raw per-volume documents.
pub trait VolumeSource {
    fn fetch(&self, volume: VolumeId) -> Result<String, SourceError>;
}

/// Opportunistic write-through store for raw volume documents.
pub trait VolumeCache {
    fn store(&self, key: &str, raw: &str) -> Result<(), CacheError>;
}

/// Cache key for one volume document.
pub fn cache_key(volume: VolumeId) -> String {
    format!("volume_{volume}")
}

/// Reads `<root>/volume-<id>/meta.json` from local disk.
#[derive(Debug, Clone)]
pub struct FsVolumeSource {
    root: PathBuf,
}

impl FsVolumeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the document for `volume`.
    pub fn volume_path(&self, volume: VolumeId) -> PathBuf {
        self.root
            .join(format!("volume-{volume}"))
            .join(VOLUME_DOCUMENT_FILE_NAME)
    }
}

impl VolumeSource for FsVolumeSource {
    fn fetch(&self, volume: VolumeId) -> Result<String, SourceError> {
        std::fs::read_to_string(self.volume_path(volume)).map_err(|err| match err.kind() {
            ErrorKind::NotFound => SourceError::NotFound(volume),
            _ => SourceError::Io {
                volume,
                message: err.to_string(),
            },
        })
    }
}

/// Process-local cache keyed by [`cache_key`].
#[derive(Debug, Default)]
pub struct MemoryVolumeCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryVolumeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl VolumeCache for MemoryVolumeCache {
    fn store(&self, key: &str, raw: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|err| CacheError {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        entries.insert(key.to_string(), raw.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{cache_key, FsVolumeSource, MemoryVolumeCache, SourceError, VolumeCache, VolumeSource};

    #[test]
    fn cache_key_uses_volume_prefix() {
        assert_eq!(cache_key(7), "volume_7");
    }

    #[test]
    fn fs_source_reads_meta_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let volume_dir = dir.path().join("volume-2");
        std::fs::create_dir_all(&volume_dir).expect("volume dir");
        std::fs::write(volume_dir.join("meta.json"), r#"{"items":[]}"#).expect("write meta");

        let source = FsVolumeSource::new(dir.path());
        assert_eq!(source.fetch(2).expect("fetch"), r#"{"items":[]}"#);
    }

    #[test]
    fn fs_source_maps_missing_file_to_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = FsVolumeSource::new(dir.path());
        assert_eq!(source.fetch(9), Err(SourceError::NotFound(9)));
    }

    #[test]
    fn memory_cache_overwrites_same_key() {
        let cache = MemoryVolumeCache::new();
        cache.store("volume_1", "first").expect("store");
        cache.store("volume_1", "second").expect("store");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("volume_1").as_deref(), Some("second"));
    }
}
