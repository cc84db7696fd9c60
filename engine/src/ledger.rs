use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::spin::SpinOutcome;

/// One committed spin, as recorded in the history file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinRecord {
    /// When the spin committed.
    pub spun_at: DateTime<Utc>,
    /// Winning entrant id.
    pub winner_id: Uuid,
    /// Winning entrant's display name at spin time.
    pub winner_label: String,
    /// Sampled angle in `[0, 360)`.
    pub sample: f64,
    /// Final orientation in `[0, 360)`.
    pub final_rotation: f64,
    /// Cumulative rotation after the spin.
    pub cumulative_rotation: f64,
}

impl From<&SpinOutcome> for SpinRecord {
    fn from(outcome: &SpinOutcome) -> Self {
        Self {
            spun_at: Utc::now(),
            winner_id: outcome.winner_id,
            winner_label: outcome.winner_label.clone(),
            sample: outcome.sample,
            final_rotation: outcome.final_rotation,
            cumulative_rotation: outcome.new_cumulative_rotation,
        }
    }
}

/// Append-only JSONL history of committed spins.
#[derive(Debug)]
pub struct SpinLedger {
    path: Option<PathBuf>,
    writer: Option<Mutex<std::fs::File>>,
}

impl SpinLedger {
    /// Opens (or creates) a ledger at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating ledger dir {}", parent.display()))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening spin ledger {}", path.display()))?;
        Ok(Self {
            path: Some(path),
            writer: Some(Mutex::new(file)),
        })
    }

    /// Returns a disabled ledger (no-op writer).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            path: None,
            writer: None,
        }
    }

    /// Returns the configured path, if enabled.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends one record as a single JSON line.
    pub fn append(&self, record: &SpinRecord) -> Result<()> {
        if let Some(writer) = &self.writer {
            let mut guard = writer.lock();
            serde_json::to_writer(&mut *guard, record)?;
            guard.write_all(b"\n")?;
            guard.flush()?;
        }
        Ok(())
    }

    /// Loads the most recent `limit` records, newest first. Unparseable
    /// lines are skipped.
    #[must_use]
    pub fn load_recent(&self, limit: usize) -> Vec<SpinRecord> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let mut records: Vec<SpinRecord> = fs::read_to_string(path)
            .map(|data| {
                data.lines()
                    .filter_map(|line| serde_json::from_str(line).ok())
                    .collect()
            })
            .unwrap_or_default();
        records.reverse();
        records.truncate(limit);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(label: &str, cumulative: f64) -> SpinRecord {
        SpinRecord {
            spun_at: Utc::now(),
            winner_id: Uuid::new_v4(),
            winner_label: label.to_string(),
            sample: 12.0,
            final_rotation: 12.0,
            cumulative_rotation: cumulative,
        }
    }

    #[test]
    fn appends_and_reads_newest_first() {
        let dir = tempdir().unwrap();
        let ledger = SpinLedger::open(dir.path().join("spins.jsonl")).unwrap();
        ledger.append(&record("Ada", 1812.0)).unwrap();
        ledger.append(&record("Grace", 3650.0)).unwrap();
        ledger.append(&record("Ada", 5460.0)).unwrap();

        let recent = ledger.load_recent(2);
        assert_eq!(recent.len(), 2);
        assert!((recent[0].cumulative_rotation - 5460.0).abs() < 1e-12);
        assert_eq!(recent[1].winner_label, "Grace");
    }

    #[test]
    fn disabled_ledger_is_a_no_op() {
        let ledger = SpinLedger::disabled();
        ledger.append(&record("Ada", 1800.0)).unwrap();
        assert!(ledger.load_recent(10).is_empty());
        assert!(ledger.path().is_none());
    }

    #[test]
    fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spins.jsonl");
        {
            let ledger = SpinLedger::open(&path).unwrap();
            ledger.append(&record("Ada", 1800.0)).unwrap();
        }
        let ledger = SpinLedger::open(&path).unwrap();
        assert_eq!(ledger.load_recent(10).len(), 1);
    }
}
