//! Workout session data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Repetition;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Active,
    Completed,
    Abandoned,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "Active",
            SessionStatus::Completed => "Completed",
            SessionStatus::Abandoned => "Abandoned",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub exercise: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutSession {
    /// Starts a new active session for `exercise`.
    pub fn start(exercise: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            exercise: exercise.into(),
            started_at,
            ended_at: None,
            status: SessionStatus::Active,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A session with its repetitions ordered by set, then rep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    pub session: WorkoutSession,
    pub repetitions: Vec<Repetition>,
}

impl SessionDetail {
    pub fn set_count(&self) -> usize {
        let mut sets: Vec<u32> = self.repetitions.iter().map(|rep| rep.set_index).collect();
        sets.sort_unstable();
        sets.dedup();
        sets.len()
    }

    /// Whether any repetition had a series column that could not be decoded.
    pub fn is_degraded(&self) -> bool {
        self.repetitions.iter().any(|rep| rep.degraded)
    }
}
