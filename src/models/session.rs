//! Session-related data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Active,
    Stopped,
}

/// Summary of the current or most recently stopped spraying run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub plot_name: Option<String>,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub samples_processed: u64,
    pub samples_snapped: u64,
    pub rows_sprayed: usize,
    pub rows_total: usize,
}

impl SessionInfo {
    pub fn coverage(&self) -> f64 {
        if self.rows_total == 0 {
            return 0.0;
        }
        self.rows_sprayed as f64 / self.rows_total as f64
    }
}
