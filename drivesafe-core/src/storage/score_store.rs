//! Persisted score snapshot.
//!
//! The snapshot is read and written wholesale; there are no partial updates.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::{Result, TelemetryError};
use crate::scoring::snapshot::ScoreSnapshot;

pub trait ScoreStore: Send + Sync {
    /// `Ok(None)` when nothing usable has been persisted.
    fn load(&self) -> Result<Option<ScoreSnapshot>>;

    fn save(&self, snapshot: &ScoreSnapshot) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
}

impl JsonFileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn load(&self) -> Result<Option<ScoreSnapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TelemetryError::io(&self.path, e)),
        };

        // A structurally incompatible file is treated as absent and gets
        // replaced by the next computation.
        match serde_json::from_str(&text) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                log::warn!(
                    "SCORE_FILE_UNREADABLE path={} error={}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn save(&self, snapshot: &ScoreSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TelemetryError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).map_err(|e| TelemetryError::io(&self.path, e))
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TelemetryError::io(&self.path, e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    snapshot: Mutex<Option<ScoreSnapshot>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<Option<ScoreSnapshot>> {
        Ok(self.snapshot.lock().clone())
    }

    fn save(&self, snapshot: &ScoreSnapshot) -> Result<()> {
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.snapshot.lock() = None;
        Ok(())
    }
}
