//! Flat JSON file mapping Zabbix event ids to the Pachca messages they produced.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CacheError;
use crate::types::MessageId;

pub type MessageMap = BTreeMap<String, MessageId>;

#[derive(Debug, Clone)]
pub struct MessageCache {
    path: PathBuf,
}

impl MessageCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the cache directory and an empty cache file if they are missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or the initial file cannot be created.
    pub fn ensure(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CacheError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        if !self.path.exists() {
            debug!(path = %self.path.display(), "initializing empty cache");
            self.write(&MessageMap::new())?;
        }
        Ok(())
    }

    /// Load the whole cache. An unreadable file counts as empty; entries
    /// without a usable message id are skipped one by one.
    #[must_use]
    pub fn read(&self) -> MessageMap {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return MessageMap::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cache unreadable, starting empty");
                return MessageMap::new();
            }
        };
        let entries: BTreeMap<String, Value> = match serde_json::from_slice(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cache corrupt, starting empty");
                return MessageMap::new();
            }
        };
        entries
            .into_iter()
            .filter_map(|(event_id, value)| match MessageId::deserialize(&value) {
                Ok(id) => Some((event_id, id)),
                Err(_) => {
                    warn!(%event_id, %value, "dropping cache entry without a usable message id");
                    None
                }
            })
            .collect()
    }

    /// Replace the cache file with `map`.
    ///
    /// The payload lands in a sibling temp file first and is renamed into
    /// place, so readers never observe a half-written cache.
    ///
    /// # Errors
    ///
    /// Returns an error when encoding, writing or renaming fails.
    pub fn write(&self, map: &MessageMap) -> Result<(), CacheError> {
        let mut payload = serde_json::to_vec_pretty(map)?;
        payload.push(b'\n');

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        if let Err(err) = fs::write(&temp_path, payload) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(err));
        }
        if let Err(err) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(err));
        }
        Ok(())
    }
}
