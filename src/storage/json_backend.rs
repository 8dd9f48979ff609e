use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::debug;

use crate::errors::{Result, TrackerError};
use crate::utils::persistence::{ensure_dir, write_atomic};

use super::KeyValueStore;

const RECORD_EXTENSION: &str = "json";
const RECORDS_DIR: &str = "records";
const BACKUPS_DIR: &str = "backups";
// Fixed width, so lexicographic order is chronological order.
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%9f";
const DEFAULT_RETENTION: usize = 5;

/// File-per-key store: `<root>/records/<key>.json`, with the previous contents of a
/// key copied to `<root>/backups/<key>/` before every overwrite.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    records_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    /// `retention` is the number of backups kept per key; at least one is always kept.
    pub fn with_retention(root: impl Into<PathBuf>, retention: usize) -> Result<Self> {
        let root = root.into();
        let records_dir = root.join(RECORDS_DIR);
        let backups_dir = root.join(BACKUPS_DIR);
        ensure_dir(&records_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            records_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.records_dir
            .join(format!("{}.{}", canonical_key(key), RECORD_EXTENSION))
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_key(key))
    }

    /// Backup file names for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    /// Replaces the current value of `key` with the contents of a listed backup.
    pub fn restore_backup(&self, key: &str, backup_name: &str) -> Result<()> {
        let listed = self.list_backups(key)?;
        if !listed.iter().any(|name| name == backup_name) {
            return Err(TrackerError::Persistence(format!(
                "backup `{}` not found for `{}`",
                backup_name, key
            )));
        }
        let contents = fs::read_to_string(self.backup_dir(key).join(backup_name))?;
        self.set(key, &contents)
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_path = dir.join(format!(
            "{}_{}.{}",
            canonical_key(key),
            timestamp,
            RECORD_EXTENSION
        ));
        fs::copy(path, &backup_path)?;
        self.prune_backups(key)
    }

    fn prune_backups(&self, key: &str) -> Result<()> {
        let backups = self.list_backups(key)?;
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_dir(key).join(name));
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.record_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.record_path(key);
        self.backup_existing_file(key, &path)?;
        write_atomic(&path, value)?;
        debug!(key, path = %path.display(), bytes = value.len(), "record written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.record_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "record".into()
    } else {
        sanitized
    }
}
