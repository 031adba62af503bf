use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_optional_datetime, parse_status},
    models::{SessionDetail, SessionStatus, WorkoutSession},
};

const SESSION_COLUMNS: &str =
    "id, exercise, started_at, ended_at, status, notes, created_at, updated_at";

fn row_to_session(row: &Row) -> Result<WorkoutSession> {
    let started_at: String = row.get("started_at")?;
    let ended_at: Option<String> = row.get("ended_at")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let status: String = row.get("status")?;

    Ok(WorkoutSession {
        id: row.get("id")?,
        exercise: row.get("exercise")?,
        started_at: parse_datetime(&started_at, "started_at")?,
        ended_at: parse_optional_datetime(ended_at, "ended_at")?,
        status: parse_status(&status)?,
        notes: row.get("notes")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_session(&self, session: &WorkoutSession) -> Result<()> {
        let record = session.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO workout_sessions (id, exercise, started_at, ended_at, status, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.exercise,
                    record.started_at.to_rfc3339(),
                    record.ended_at.as_ref().map(|dt| dt.to_rfc3339()),
                    record.status.as_str(),
                    record.notes,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("failed to insert session {}", record.id))?;
            Ok(())
        })
        .await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<WorkoutSession>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![session_id])?;
            let session = match rows.next()? {
                Some(row) => Some(row_to_session(row)?),
                None => None,
            };
            Ok(session)
        })
        .await
    }

    /// Lists sessions, most recently started first.
    pub async fn list_sessions(&self, limit: usize, offset: usize) -> Result<Vec<WorkoutSession>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM workout_sessions
                 ORDER BY started_at DESC
                 LIMIT ?1 OFFSET ?2"
            ))?;

            let mut rows = stmt.query(params![limit, offset])?;
            let mut sessions = Vec::new();
            while let Some(row) = rows.next()? {
                sessions.push(row_to_session(row)?);
            }

            Ok(sessions)
        })
        .await
    }

    pub async fn finish_session(
        &self,
        session_id: &str,
        status: SessionStatus,
        ended_at: DateTime<Utc>,
    ) -> Result<()> {
        if status == SessionStatus::Active {
            return Err(anyhow!("cannot finish session {session_id} as Active"));
        }

        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE workout_sessions
                 SET status = ?1,
                     ended_at = ?2,
                     updated_at = ?3
                 WHERE id = ?4",
                params![
                    status.as_str(),
                    ended_at.to_rfc3339(),
                    Utc::now().to_rfc3339(),
                    session_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Session {session_id} not found"));
            }

            Ok(())
        })
        .await
    }

    pub async fn update_session_notes(
        &self,
        session_id: &str,
        notes: Option<String>,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE workout_sessions
                 SET notes = ?1,
                     updated_at = ?2
                 WHERE id = ?3",
                params![notes, Utc::now().to_rfc3339(), session_id],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Session {session_id} not found"));
            }

            Ok(())
        })
        .await
    }

    /// Deletes a session and its repetitions. Returns false if it did not exist.
    pub async fn delete_session(&self, session_id: &str) -> Result<bool> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM repetitions WHERE session_id = ?1",
                params![session_id],
            )?;
            let rows_affected = tx.execute(
                "DELETE FROM workout_sessions WHERE id = ?1",
                params![session_id],
            )?;

            tx.commit()?;
            Ok(rows_affected > 0)
        })
        .await
    }

    pub async fn get_session_detail(&self, session_id: &str) -> Result<Option<SessionDetail>> {
        let Some(session) = self.get_session(session_id).await? else {
            return Ok(None);
        };
        let repetitions = self.get_repetitions_for_session(session_id).await?;
        Ok(Some(SessionDetail {
            session,
            repetitions,
        }))
    }
}
