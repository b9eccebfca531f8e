//! High score persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Single-integer key/value store that outlives game sessions.
pub trait ScoreStore {
    /// Stored high score, 0 when nothing was saved yet.
    fn load(&mut self) -> Result<u32>;
    fn save(&mut self, high_score: u32) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    high_score: u32,
}

/// Keeps the high score in a small TOML file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&mut self) -> Result<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no high score file at {}", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let record: Record = toml::from_str(&text).map_err(|source| Error::ScoreFile { path: self.path.clone(), source })?;
        Ok(record.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        let text = toml::to_string(&Record { high_score })?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// Store that forgets everything when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    high_score: u32,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_high_score(high_score: u32) -> Self {
        MemoryStore { high_score, saves: 0 }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// How many times `save` was called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.high_score)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.high_score = high_score;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::process;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("gridsnake-{}-{}.toml", name, process::id()))
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let mut store = FileStore::new(temp_path("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn file_store_keeps_the_score() {
        let path = temp_path("saved");
        let mut store = FileStore::new(&path);
        store.save(130).unwrap();

        let mut reopened = FileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), 130);
        assert!(fs::read_to_string(&path).unwrap().contains("high_score = 130"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn garbage_file_is_an_error() {
        let path = temp_path("garbage");
        fs::write(&path, "high_score = \"lots\"").unwrap();

        let mut store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(Error::ScoreFile { .. })));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn memory_store_counts_saves() {
        let mut store = MemoryStore::with_high_score(40);
        assert_eq!(store.load().unwrap(), 40);
        store.save(50).unwrap();
        assert_eq!(store.high_score(), 50);
        assert_eq!(store.saves(), 1);
    }
}
