use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exam::summary::ExamSummary;

pub const SCHEMA_VERSION: u32 = 1;

/// Records kept on disk; the oldest are dropped beyond this.
pub const MAX_HISTORY: usize = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub exam_title: String,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: u32,
    pub summary: ExamSummary,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    #[serde(default)]
    pub records: Vec<ExamRecord>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            records: Vec::new(),
        }
    }
}

impl HistoryData {
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn push(&mut self, record: ExamRecord) {
        self.records.push(record);
        if self.records.len() > MAX_HISTORY {
            let excess = self.records.len() - MAX_HISTORY;
            self.records.drain(..excess);
        }
    }
}
