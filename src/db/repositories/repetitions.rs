use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::codec::{Sample, SampleSeries};
use crate::db::{
    connection::Database,
    helpers::{parse_datetime, to_u32},
    models::{RepSeries, Repetition},
};
use crate::log_warn;
use crate::settings::ReadPolicy;

const ENABLE_LOGS: bool = true;

const REPETITION_COLUMNS: &str = "id, session_id, set_index, rep_index, force_curve, \
     velocity_curve, position_curve, timestamps_ms, recorded_at";

/// Reads one series column according to `policy`.
///
/// Lenient reads swap an undecodable column for an empty series and flag the
/// repetition as degraded.
fn read_series<T: Sample>(
    row: &Row,
    column: &str,
    rep_id: &str,
    policy: ReadPolicy,
    degraded: &mut bool,
) -> Result<SampleSeries<T>> {
    match policy {
        ReadPolicy::Strict => row
            .get::<_, SampleSeries<T>>(column)
            .with_context(|| format!("failed to decode {column} for repetition {rep_id}")),
        ReadPolicy::Lenient => {
            let raw: String = row.get(column)?;
            match SampleSeries::decode(&raw) {
                Ok(series) => Ok(series),
                Err(err) => {
                    log_warn!("Repetition {rep_id}: dropping unreadable {column}: {err}");
                    *degraded = true;
                    Ok(SampleSeries::new())
                }
            }
        }
    }
}

fn row_to_repetition(row: &Row, policy: ReadPolicy) -> Result<Repetition> {
    let id: String = row.get("id")?;
    let set_index: i64 = row.get("set_index")?;
    let rep_index: i64 = row.get("rep_index")?;
    let recorded_at: String = row.get("recorded_at")?;

    let mut degraded = false;
    let series = RepSeries {
        force_curve: read_series(row, "force_curve", &id, policy, &mut degraded)?,
        velocity_curve: read_series(row, "velocity_curve", &id, policy, &mut degraded)?,
        position_curve: read_series(row, "position_curve", &id, policy, &mut degraded)?,
        timestamps_ms: read_series(row, "timestamps_ms", &id, policy, &mut degraded)?,
    };

    Ok(Repetition {
        session_id: row.get("session_id")?,
        set_index: to_u32(set_index, "set_index")?,
        rep_index: to_u32(rep_index, "rep_index")?,
        series,
        recorded_at: parse_datetime(&recorded_at, "recorded_at")?,
        degraded,
        id,
    })
}

fn session_row_exists(conn: &Connection, session_id: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT id FROM workout_sessions WHERE id = ?1",
            params![session_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    pub async fn insert_repetition(&self, repetition: &Repetition) -> Result<()> {
        let record = repetition.clone();
        self.execute(move |conn| {
            if !session_row_exists(conn, &record.session_id)? {
                return Err(anyhow!("Session {} not found", record.session_id));
            }

            conn.execute(
                "INSERT INTO repetitions (id, session_id, set_index, rep_index, force_curve, velocity_curve, position_curve, timestamps_ms, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.session_id,
                    record.set_index,
                    record.rep_index,
                    record.series.force_curve,
                    record.series.velocity_curve,
                    record.series.position_curve,
                    record.series.timestamps_ms,
                    record.recorded_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("failed to insert repetition {}", record.id))?;
            Ok(())
        })
        .await
    }

    /// Replaces every series of a repetition in one statement.
    pub async fn replace_repetition_series(&self, rep_id: &str, series: RepSeries) -> Result<()> {
        let rep_id = rep_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn
                .execute(
                    "UPDATE repetitions
                     SET force_curve = ?1,
                         velocity_curve = ?2,
                         position_curve = ?3,
                         timestamps_ms = ?4
                     WHERE id = ?5",
                    params![
                        series.force_curve,
                        series.velocity_curve,
                        series.position_curve,
                        series.timestamps_ms,
                        rep_id,
                    ],
                )
                .with_context(|| format!("failed to replace series for repetition {rep_id}"))?;

            if rows_affected == 0 {
                return Err(anyhow!("Repetition {rep_id} not found"));
            }

            Ok(())
        })
        .await
    }

    pub async fn get_repetition(&self, rep_id: &str) -> Result<Option<Repetition>> {
        let rep_id = rep_id.to_string();
        let policy = self.read_policy();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REPETITION_COLUMNS} FROM repetitions WHERE id = ?1"
            ))?;

            let mut rows = stmt.query(params![rep_id])?;
            let repetition = match rows.next()? {
                Some(row) => Some(row_to_repetition(row, policy)?),
                None => None,
            };
            Ok(repetition)
        })
        .await
    }

    /// Returns a session's repetitions ordered by set, then rep.
    pub async fn get_repetitions_for_session(&self, session_id: &str) -> Result<Vec<Repetition>> {
        let session_id = session_id.to_string();
        let policy = self.read_policy();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REPETITION_COLUMNS} FROM repetitions
                 WHERE session_id = ?1
                 ORDER BY set_index ASC, rep_index ASC"
            ))?;

            let mut rows = stmt.query(params![session_id])?;
            let mut repetitions = Vec::new();
            while let Some(row) = rows.next()? {
                repetitions.push(row_to_repetition(row, policy)?);
            }

            Ok(repetitions)
        })
        .await
    }

    pub async fn count_repetitions(&self, session_id: &str) -> Result<usize> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM repetitions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;
            usize::try_from(count).map_err(|_| anyhow!("negative repetition count {count}"))
        })
        .await
    }

    /// Deletes a repetition. Returns false if it did not exist.
    pub async fn delete_repetition(&self, rep_id: &str) -> Result<bool> {
        let rep_id = rep_id.to_string();
        self.execute(move |conn| {
            let rows_affected =
                conn.execute("DELETE FROM repetitions WHERE id = ?1", params![rep_id])?;
            Ok(rows_affected > 0)
        })
        .await
    }
}
