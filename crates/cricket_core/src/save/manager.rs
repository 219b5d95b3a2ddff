use indexmap::IndexMap;
use std::fs::{self, remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::SnapshotError;
use super::format::{decode_snapshot, encode_snapshot, MatchSnapshot};
use super::migration::migrate_snapshot;
use crate::models::{MatchState, MatchStatus};

const SNAPSHOT_EXTENSION: &str = "match";

/// Where the scorer's match snapshots live.
pub trait SnapshotStore {
    /// Store `state` under `key`, replacing whatever was there.
    fn save(&mut self, key: &str, state: &MatchState) -> Result<(), SnapshotError>;

    /// Load and migrate the snapshot under `key`.
    fn load(&self, key: &str) -> Result<MatchSnapshot, SnapshotError>;

    fn exists(&self, key: &str) -> bool;

    fn delete(&mut self, key: &str) -> Result<(), SnapshotError>;

    fn keys(&self) -> Result<Vec<String>, SnapshotError>;

    /// Summary of the snapshot under `key`, `None` when absent.
    fn info(&self, key: &str) -> Result<Option<SnapshotInfo>, SnapshotError> {
        if !self.exists(key) {
            return Ok(None);
        }
        let snapshot = self.load(key)?;
        Ok(Some(SnapshotInfo::from_snapshot(key, &snapshot)))
    }

    /// Every snapshot, most recent first.
    fn all_info(&self) -> Vec<SnapshotInfo> {
        let mut infos: Vec<SnapshotInfo> = self
            .keys()
            .unwrap_or_default()
            .iter()
            .filter_map(|key| self.info(key).ok().flatten())
            .collect();
        infos.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        infos
    }
}

fn validate_key(key: &str) -> Result<(), SnapshotError> {
    let valid = !key.is_empty()
        && key.len() <= 64
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(SnapshotError::InvalidKey { key: key.to_string() });
    }
    Ok(())
}

/// Encoded snapshots held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, key: &str, state: &MatchState) -> Result<(), SnapshotError> {
        validate_key(key)?;
        let bytes = encode_snapshot(&MatchSnapshot::new(state.clone()))?;
        log::debug!("Stored {} bytes under '{}'", bytes.len(), key);
        self.entries.insert(key.to_string(), bytes);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<MatchSnapshot, SnapshotError> {
        validate_key(key)?;
        let bytes = self.entries.get(key).ok_or_else(|| SnapshotError::NotFound { key: key.to_string() })?;
        migrate_snapshot(decode_snapshot(bytes)?)
    }

    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn delete(&mut self, key: &str) -> Result<(), SnapshotError> {
        validate_key(key)?;
        self.entries.shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SnapshotError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// One `<key>.match` file per snapshot in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SnapshotError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, SNAPSHOT_EXTENSION)))
    }

    /// Write atomically: temp file, fsync, rename.
    pub fn save_to_path(path: &Path, snapshot: &MatchSnapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = encode_snapshot(snapshot)?;
        let temp_path = path.with_extension("tmp");

        let written = write_synced(&temp_path, &data).and_then(|_| rename(&temp_path, path));
        if let Err(err) = written {
            let _ = remove_file(&temp_path);
            log::warn!("Failed to save {:?}: {}", path, err);
            return Err(err.into());
        }

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<MatchSnapshot, SnapshotError> {
        if !path.exists() {
            return Err(SnapshotError::NotFound { key: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = migrate_snapshot(decode_snapshot(&data)?)?;

        log::info!("Loaded snapshot ({} bytes) from {:?}", data.len(), path);
        Ok(snapshot)
    }
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    file.sync_all()
}

impl SnapshotStore for FileStore {
    fn save(&mut self, key: &str, state: &MatchState) -> Result<(), SnapshotError> {
        let path = self.path_for(key)?;
        Self::save_to_path(&path, &MatchSnapshot::new(state.clone()))
    }

    fn load(&self, key: &str) -> Result<MatchSnapshot, SnapshotError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Err(SnapshotError::NotFound { key: key.to_string() });
        }
        Self::load_from_path(&path)
    }

    fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.exists()).unwrap_or(false)
    }

    fn delete(&mut self, key: &str) -> Result<(), SnapshotError> {
        let path = self.path_for(key)?;
        if path.exists() {
            remove_file(&path)?;
            log::info!("Deleted snapshot '{}'", key);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, SnapshotError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInfo {
    pub key: String,
    pub version: u32,
    pub saved_at: i64,
    pub team1: String,
    pub team2: String,
    pub status: MatchStatus,
    pub deliveries: usize,
}

impl SnapshotInfo {
    pub fn from_snapshot(key: &str, snapshot: &MatchSnapshot) -> Self {
        let state = &snapshot.state;
        Self {
            key: key.to_string(),
            version: snapshot.version,
            saved_at: snapshot.saved_at,
            team1: state.team1.clone(),
            team2: state.team2.clone(),
            status: state.status,
            deliveries: state.all_events().count(),
        }
    }

    pub fn display_text(&self) -> String {
        format!(
            "{}: {} v {} ({}, {} deliveries)",
            self.key, self.team1, self.team2, self.status, self.deliveries
        )
    }
}
