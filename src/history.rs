//! Append-only score history persisted as a flat CSV log.
//!
//! One row per completed session: `timestamp,wpm`. Rows are never rewritten
//! or deleted; readers tolerate an absent file (first run) and skip rows they
//! cannot parse.

use chrono::Local;
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the history log, immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub timestamp: String,
    pub wpm: f64,
}

impl ScoreRecord {
    /// A record stamped with the current wall-clock time at second precision.
    pub fn now(wpm: f64) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            wpm,
        }
    }
}

pub trait HistoryStore {
    fn append(&self, record: &ScoreRecord) -> io::Result<()>;
    fn read_all(&self) -> Vec<ScoreRecord>;
}

#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path =
            AppDirs::history_path().unwrap_or_else(|| PathBuf::from("kadans_history.csv"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for FileHistoryStore {
    fn append(&self, record: &ScoreRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .serialize(record)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writer.flush()
    }

    fn read_all(&self) -> Vec<ScoreRecord> {
        let mut reader = match ReaderBuilder::new().has_headers(false).from_path(&self.path) {
            Ok(reader) => reader,
            Err(err) => {
                // first run: no log yet
                debug!("no readable history at {}: {err}", self.path.display());
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for row in reader.deserialize::<ScoreRecord>() {
            match row {
                Ok(record) => records.push(record),
                Err(err) => warn!("skipping malformed history row: {err}"),
            }
        }
        records
    }
}

/// Highest WPM across all records, floored; 0 when history is empty.
pub fn high_score(records: &[ScoreRecord]) -> u64 {
    records
        .iter()
        .map(|r| r.wpm)
        .fold(0.0_f64, f64::max)
        .floor() as u64
}
