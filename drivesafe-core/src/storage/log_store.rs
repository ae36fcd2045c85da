//! Per-channel record logs.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemetryError};
use crate::logging::structured::LogContext;
use crate::records::codec::{encode_line, parse_lines, parse_text};
use crate::records::model::LogRecord;

/// Independent log streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Simulated drives.
    Sim,
    /// Drives recorded from the OBD bridge.
    Real,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sim => "sim",
            Channel::Real => "real",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record storage.
///
/// Appends are not safe against concurrent writers to the same channel.
pub trait LogStore: Send + Sync {
    fn append(&self, channel: Channel, record: &LogRecord) -> Result<()>;

    /// All parseable records in append order. Malformed lines are skipped.
    fn read_all(&self, channel: Channel) -> Result<Vec<LogRecord>>;

    fn clear(&self, channel: Channel) -> Result<()>;
}

/// One `<channel>_logs.jsonl` file per channel under a directory.
#[derive(Debug, Clone)]
pub struct JsonLinesLogStore {
    dir: PathBuf,
}

impl JsonLinesLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, channel: Channel) -> PathBuf {
        self.dir.join(format!("{}_logs.jsonl", channel.as_str()))
    }

    fn read_text(path: &Path) -> Result<String> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(TelemetryError::io(path, e)),
        }
    }
}

impl LogStore for JsonLinesLogStore {
    fn append(&self, channel: Channel, record: &LogRecord) -> Result<()> {
        let path = self.path_for(channel);
        let line = encode_line(record)?;

        // Read-modify-write: the whole file is rewritten on every append.
        let mut text = Self::read_text(&path)?;
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&line);
        text.push('\n');

        fs::create_dir_all(&self.dir).map_err(|e| TelemetryError::io(&self.dir, e))?;
        fs::write(&path, text).map_err(|e| TelemetryError::io(&path, e))?;

        log::debug!(
            "LOG_APPEND channel={} kind={} path={}",
            channel,
            record.kind(),
            path.display()
        );
        Ok(())
    }

    fn read_all(&self, channel: Channel) -> Result<Vec<LogRecord>> {
        let path = self.path_for(channel);
        let text = Self::read_text(&path)?;
        let ctx = LogContext::new("store").with_channel(channel.as_str());
        Ok(parse_text(&text, &ctx))
    }

    fn clear(&self, channel: Channel) -> Result<()> {
        let path = self.path_for(channel);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("LOG_CLEARED channel={}", channel);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TelemetryError::io(&path, e)),
        }
    }
}

/// In-memory store holding raw lines, so parsing behaves as for files.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    lines: Mutex<HashMap<Channel, Vec<String>>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw line verbatim, bypassing encoding.
    pub fn push_raw(&self, channel: Channel, line: &str) {
        self.lines
            .lock()
            .entry(channel)
            .or_default()
            .push(line.to_string());
    }

    pub fn line_count(&self, channel: Channel) -> usize {
        self.lines.lock().get(&channel).map_or(0, |l| l.len())
    }
}

impl LogStore for MemoryLogStore {
    fn append(&self, channel: Channel, record: &LogRecord) -> Result<()> {
        let line = encode_line(record)?;
        self.push_raw(channel, &line);
        Ok(())
    }

    fn read_all(&self, channel: Channel) -> Result<Vec<LogRecord>> {
        let lines = self.lines.lock();
        let ctx = LogContext::new("memory").with_channel(channel.as_str());
        Ok(lines
            .get(&channel)
            .map(|l| parse_lines(l.iter().map(|s| s.as_str()), &ctx))
            .unwrap_or_default())
    }

    fn clear(&self, channel: Channel) -> Result<()> {
        self.lines.lock().remove(&channel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::model::DataRecord;
    use chrono::{Duration, TimeZone, Utc};

    fn data(secs: i64, speed: f64) -> LogRecord {
        LogRecord::Data(DataRecord {
            speed: Some(speed),
            ..DataRecord::at(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap() + Duration::seconds(secs))
        })
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Sim.as_str(), "sim");
        assert_eq!(Channel::Real.to_string(), "real");
    }

    #[test]
    fn test_file_store_append_read_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesLogStore::new(dir.path());

        assert!(store.read_all(Channel::Real).unwrap().is_empty());

        store.append(Channel::Real, &data(0, 10.0)).unwrap();
        store.append(Channel::Real, &data(1, 12.0)).unwrap();
        store.append(Channel::Sim, &data(0, 99.0)).unwrap();

        let real = store.read_all(Channel::Real).unwrap();
        assert_eq!(real, vec![data(0, 10.0), data(1, 12.0)]);
        assert_eq!(store.read_all(Channel::Sim).unwrap().len(), 1);

        store.clear(Channel::Real).unwrap();
        assert!(store.read_all(Channel::Real).unwrap().is_empty());
        assert_eq!(store.read_all(Channel::Sim).unwrap().len(), 1);
        // Clearing twice is fine.
        store.clear(Channel::Real).unwrap();
    }

    #[test]
    fn test_file_store_skips_corrupt_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLinesLogStore::new(dir.path());
        store.append(Channel::Sim, &data(0, 10.0)).unwrap();

        let path = store.path_for(Channel::Sim);
        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push_str("{\"type\":\"DATA\",\"timest");
        std::fs::write(&path, text).unwrap();

        store.append(Channel::Sim, &data(1, 11.0)).unwrap();
        let records = store.read_all(Channel::Sim).unwrap();
        assert_eq!(records, vec![data(0, 10.0), data(1, 11.0)]);
    }

    #[test]
    fn test_memory_store_raw_lines() {
        let store = MemoryLogStore::new();
        store.append(Channel::Real, &data(0, 10.0)).unwrap();
        store.push_raw(Channel::Real, "garbage");
        assert_eq!(store.line_count(Channel::Real), 2);
        assert_eq!(store.read_all(Channel::Real).unwrap().len(), 1);
        store.clear(Channel::Real).unwrap();
        assert_eq!(store.line_count(Channel::Real), 0);
    }
}
