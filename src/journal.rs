//! JSONL run journal
//!
//! One line per iteration. Write failures are logged and never stop a run.

use crate::swap::SwapKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Receipt status success
    Confirmed,
    /// Mined with a failed status
    Reverted,
    /// Never reached a receipt
    Skipped,
}

/// Entry in the run journal
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
    pub iteration: u32,
    pub swap: SwapKind,
    pub outcome: Outcome,
    pub tx_hash: Option<String>,
    pub gas_used: Option<u64>,
    pub error: Option<String>,
}

pub struct RunJournal {
    run_id: Uuid,
    path: Option<PathBuf>,
}

impl RunJournal {
    /// Journal appending to `path`, or a no-op journal for `None`
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            path,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn record(
        &self,
        iteration: u32,
        swap: SwapKind,
        outcome: Outcome,
        tx_hash: Option<String>,
        gas_used: Option<u64>,
        error: Option<String>,
    ) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = JournalEntry {
            timestamp: Utc::now(),
            run_id: self.run_id,
            iteration,
            swap,
            outcome,
            tx_hash,
            gas_used,
            error,
        };

        if let Err(e) = Self::append(path, &entry) {
            tracing::warn!(error = %e, path = %path.display(), "Failed to write journal entry");
        }
    }

    fn append(path: &Path, entry: &JournalEntry) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}
