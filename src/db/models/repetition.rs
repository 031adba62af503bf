//! Repetition data model.
//!
//! One row per completed movement cycle. Every curve is stored as codec text
//! in its own column and replaced as a whole, never patched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::SampleSeries;

/// Sample series captured for a single repetition.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepSeries {
    pub force_curve: SampleSeries<f64>,
    pub velocity_curve: SampleSeries<f64>,
    pub position_curve: SampleSeries<f64>,
    /// Millisecond offsets from the start of the repetition.
    pub timestamps_ms: SampleSeries<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Repetition {
    pub id: String,
    pub session_id: String,
    pub set_index: u32,
    pub rep_index: u32,
    pub series: RepSeries,
    pub recorded_at: DateTime<Utc>,
    /// Set on read when a series column failed to decode and was replaced by
    /// an empty series. Never persisted.
    #[serde(default)]
    pub degraded: bool,
}

impl Repetition {
    pub fn new(
        session_id: impl Into<String>,
        set_index: u32,
        rep_index: u32,
        series: RepSeries,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            set_index,
            rep_index,
            series,
            recorded_at: Utc::now(),
            degraded: false,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.series.timestamps_ms.len()
    }
}
