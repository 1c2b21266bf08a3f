//! Persistence of the leaderboard.
//!
//! The leaderboard is written as one JSON blob under a fixed key in a
//! key-value store. Persistence is best-effort: a blob that cannot be read or
//! parsed yields an empty leaderboard, and a failed write leaves the
//! in-memory leaderboard authoritative. Both are logged, never returned to
//! the game.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::board::Leaderboard;
use crate::core::Difficulty;
use crate::error::{MemoryMatchError, Result};

/// A string key-value store that outlives the process.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store, for tests and hosts without persistence.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value directly.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// One file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store files under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(MemoryMatchError::Storage(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A leaderboard bound to its backing store.
#[derive(Debug)]
pub struct LeaderboardStore<S: KeyValueStore> {
    store: S,
    key: String,
    board: Leaderboard,
}

impl<S: KeyValueStore> LeaderboardStore<S> {
    /// Load the leaderboard stored under `key`.
    ///
    /// Missing data gives an empty leaderboard. Unreadable or corrupt data
    /// also gives an empty leaderboard and is logged.
    pub fn load(store: S, key: impl Into<String>, capacity: usize) -> Self {
        let key = key.into();
        let board = match store.get(&key) {
            Ok(Some(raw)) => match Leaderboard::from_json(&raw, capacity) {
                Ok(board) => {
                    debug!(key = %key, "leaderboard loaded");
                    board
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "stored leaderboard is corrupt, starting empty");
                    Leaderboard::new(capacity)
                }
            },
            Ok(None) => Leaderboard::new(capacity),
            Err(e) => {
                warn!(key = %key, error = %e, "could not read leaderboard, starting empty");
                Leaderboard::new(capacity)
            }
        };

        Self { store, key, board }
    }

    /// Record a completion time and persist the whole leaderboard.
    ///
    /// Returns the 1-based rank the time took, if any.
    pub fn record_time(&mut self, difficulty: Difficulty, seconds: f64) -> Option<usize> {
        let rank = self.board.record(difficulty, seconds);
        info!(%difficulty, seconds, rank = ?rank, "time recorded");
        self.persist();
        rank
    }

    /// Times for a difficulty, best first.
    #[must_use]
    pub fn entries(&self, difficulty: Difficulty) -> &[f64] {
        self.board.entries(difficulty)
    }

    /// Display lines for a difficulty.
    #[must_use]
    pub fn lines(&self, difficulty: Difficulty) -> Vec<String> {
        self.board.lines(difficulty)
    }

    #[must_use]
    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forget every time and delete the stored blob.
    pub fn clear(&mut self) {
        self.board.clear();
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "could not delete stored leaderboard");
        }
    }

    fn persist(&mut self) {
        let result = self
            .board
            .to_json()
            .and_then(|json| self.store.set(&self.key, &json));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "could not persist leaderboard");
        }
    }
}
