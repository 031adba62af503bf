//! Integration tests for the workout store and its sample series columns.

use chrono::{Duration, Utc};
use reptrack_lib::{
    App, Database, ReadPolicy, RepSeries, Repetition, SampleSeries, SessionStatus, Settings,
    WorkoutSession,
};
use rusqlite::params;
use tempfile::tempdir;

fn capture_window(seed: f64) -> RepSeries {
    let force: Vec<f64> = (0..50).map(|i| 400.0 + (i as f64 * 0.21 + seed).sin() * 150.5).collect();
    let velocity: Vec<f64> = (0..50).map(|i| (i as f64 / 49.0) * 0.83 - seed * 0.01).collect();
    let position: Vec<f64> = (0..50).map(|i| (i as f64 * 0.013).powi(2)).collect();
    let timestamps: Vec<i64> = (0..50).map(|i| i * 40).collect();

    RepSeries {
        force_curve: force.into(),
        velocity_curve: velocity.into(),
        position_curve: position.into(),
        timestamps_ms: timestamps.into(),
    }
}

async fn seeded_session(db: &Database) -> WorkoutSession {
    let session = WorkoutSession::start("back squat", Utc::now());
    db.insert_session(&session).await.unwrap();
    session
}

async fn corrupt_force_curve(db: &Database, rep_id: &str) {
    let rep_id = rep_id.to_string();
    db.execute(move |conn| {
        Ok(conn.execute(
            "UPDATE repetitions SET force_curve = '[1.0,abc]' WHERE id = ?1",
            params![rep_id],
        )?)
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_repetition_series_round_trip() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let rep = Repetition::new(&session.id, 0, 0, capture_window(0.3));
    db.insert_repetition(&rep).await.unwrap();

    let loaded = db.get_repetition(&rep.id).await.unwrap().unwrap();
    assert!(!loaded.degraded);
    assert_eq!(loaded.sample_count(), 50);
    assert_eq!(loaded.series.force_curve.len(), 50);
    for (original, restored) in rep
        .series
        .force_curve
        .iter()
        .zip(loaded.series.force_curve.iter())
    {
        assert_eq!(original.to_bits(), restored.to_bits());
    }
    assert_eq!(loaded.series, rep.series);
    assert_eq!(loaded.recorded_at.timestamp_millis(), rep.recorded_at.timestamp_millis());
}

#[tokio::test]
async fn test_series_columns_hold_codec_text() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let series = RepSeries {
        force_curve: vec![1.5, 2.7, 3.14, 0.0, -1.0].into(),
        timestamps_ms: vec![100, 200, 300, 0, -50].into(),
        ..RepSeries::default()
    };
    let rep = Repetition::new(&session.id, 0, 0, series);
    db.insert_repetition(&rep).await.unwrap();

    let rep_id = rep.id.clone();
    let columns: (String, String, String) = db
        .execute(move |conn| {
            Ok(conn.query_row(
                "SELECT force_curve, velocity_curve, timestamps_ms FROM repetitions WHERE id = ?1",
                params![rep_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )?)
        })
        .await
        .unwrap();

    assert_eq!(columns.0, "[1.5,2.7,3.14,0.0,-1.0]");
    assert_eq!(columns.1, "[]");
    assert_eq!(columns.2, "[100,200,300,0,-50]");
}

#[tokio::test]
async fn test_repetitions_are_ordered_by_set_then_rep() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    for (set_index, rep_index) in [(1, 1), (0, 2), (1, 0), (0, 0), (0, 1)] {
        let rep = Repetition::new(&session.id, set_index, rep_index, RepSeries::default());
        db.insert_repetition(&rep).await.unwrap();
    }

    let order: Vec<(u32, u32)> = db
        .get_repetitions_for_session(&session.id)
        .await
        .unwrap()
        .iter()
        .map(|rep| (rep.set_index, rep.rep_index))
        .collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    assert_eq!(db.count_repetitions(&session.id).await.unwrap(), 5);
}

#[tokio::test]
async fn test_duplicate_rep_position_is_rejected() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let first = Repetition::new(&session.id, 0, 0, RepSeries::default());
    let second = Repetition::new(&session.id, 0, 0, RepSeries::default());
    db.insert_repetition(&first).await.unwrap();
    assert!(db.insert_repetition(&second).await.is_err());
}

#[tokio::test]
async fn test_replace_series_overwrites_whole_fields() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let rep = Repetition::new(&session.id, 0, 0, capture_window(0.1));
    db.insert_repetition(&rep).await.unwrap();

    let replacement = RepSeries {
        force_curve: vec![42.5].into(),
        ..RepSeries::default()
    };
    db.replace_repetition_series(&rep.id, replacement.clone())
        .await
        .unwrap();

    let loaded = db.get_repetition(&rep.id).await.unwrap().unwrap();
    assert_eq!(loaded.series, replacement);
    assert!(loaded.series.timestamps_ms.is_empty());

    assert!(db
        .replace_repetition_series("missing", RepSeries::default())
        .await
        .is_err());
}

#[tokio::test]
async fn test_non_finite_sample_is_not_stored() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let series = RepSeries {
        velocity_curve: vec![0.2, f64::INFINITY].into(),
        ..RepSeries::default()
    };
    let rep = Repetition::new(&session.id, 0, 0, series);
    assert!(db.insert_repetition(&rep).await.is_err());
    assert_eq!(db.count_repetitions(&session.id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_repetition_requires_existing_session() {
    let db = Database::in_memory().unwrap();
    let rep = Repetition::new("no-such-session", 0, 0, RepSeries::default());
    let err = db.insert_repetition(&rep).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_strict_read_fails_on_malformed_column() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let rep = Repetition::new(&session.id, 0, 0, capture_window(0.5));
    db.insert_repetition(&rep).await.unwrap();
    corrupt_force_curve(&db, &rep.id).await;

    let err = db.get_repetition(&rep.id).await.unwrap_err();
    assert!(format!("{err:#}").contains("force_curve"));
    assert!(db.get_repetitions_for_session(&session.id).await.is_err());
}

#[tokio::test]
async fn test_lenient_read_degrades_malformed_column() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let rep = Repetition::new(&session.id, 0, 0, capture_window(0.5));
    db.insert_repetition(&rep).await.unwrap();
    corrupt_force_curve(&db, &rep.id).await;

    let lenient = db.clone().with_read_policy(ReadPolicy::Lenient);
    let loaded = lenient.get_repetition(&rep.id).await.unwrap().unwrap();
    assert!(loaded.degraded);
    assert!(loaded.series.force_curve.is_empty());
    assert_eq!(loaded.series.timestamps_ms, rep.series.timestamps_ms);

    let detail = lenient.get_session_detail(&session.id).await.unwrap().unwrap();
    assert!(detail.is_degraded());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let db = Database::in_memory().unwrap();

    let earlier = WorkoutSession::start("deadlift", Utc::now() - Duration::hours(2));
    let later = WorkoutSession::start("bench press", Utc::now());
    db.insert_session(&earlier).await.unwrap();
    db.insert_session(&later).await.unwrap();

    let listed = db.list_sessions(10, 0).await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![later.id.as_str(), earlier.id.as_str()]);
    assert_eq!(db.list_sessions(1, 1).await.unwrap()[0].id, earlier.id);

    let ended_at = Utc::now();
    db.finish_session(&earlier.id, SessionStatus::Completed, ended_at)
        .await
        .unwrap();
    db.update_session_notes(&earlier.id, Some("felt heavy".into()))
        .await
        .unwrap();

    let finished = db.get_session(&earlier.id).await.unwrap().unwrap();
    assert_eq!(finished.status, SessionStatus::Completed);
    assert_eq!(finished.notes.as_deref(), Some("felt heavy"));
    assert_eq!(
        finished.ended_at.map(|dt| dt.timestamp_millis()),
        Some(ended_at.timestamp_millis())
    );

    assert!(db
        .finish_session(&later.id, SessionStatus::Active, Utc::now())
        .await
        .is_err());
    assert!(db
        .finish_session("missing", SessionStatus::Abandoned, Utc::now())
        .await
        .is_err());
}

#[tokio::test]
async fn test_delete_session_removes_repetitions() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    for rep_index in 0..3 {
        let rep = Repetition::new(&session.id, 0, rep_index, capture_window(0.0));
        db.insert_repetition(&rep).await.unwrap();
    }

    assert!(db.delete_session(&session.id).await.unwrap());
    assert!(db.get_session(&session.id).await.unwrap().is_none());
    assert_eq!(db.count_repetitions(&session.id).await.unwrap(), 0);
    assert!(!db.delete_session(&session.id).await.unwrap());
}

#[tokio::test]
async fn test_delete_single_repetition() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    let rep = Repetition::new(&session.id, 0, 0, RepSeries::default());
    db.insert_repetition(&rep).await.unwrap();

    assert!(db.delete_repetition(&rep.id).await.unwrap());
    assert!(db.get_repetition(&rep.id).await.unwrap().is_none());
    assert!(!db.delete_repetition(&rep.id).await.unwrap());
}

#[tokio::test]
async fn test_session_detail_exports_curves_as_arrays() {
    let db = Database::in_memory().unwrap();
    let session = seeded_session(&db).await;

    for set_index in 0..2 {
        let series = RepSeries {
            force_curve: vec![10.0, 12.5].into(),
            timestamps_ms: vec![0, 40].into(),
            ..RepSeries::default()
        };
        let rep = Repetition::new(&session.id, set_index, 0, series);
        db.insert_repetition(&rep).await.unwrap();
    }

    let detail = db.get_session_detail(&session.id).await.unwrap().unwrap();
    assert_eq!(detail.set_count(), 2);
    assert!(!detail.is_degraded());

    let json: serde_json::Value = serde_json::to_value(&detail).unwrap();
    let first = &json["repetitions"][0]["series"];
    assert_eq!(first["forceCurve"], serde_json::json!([10.0, 12.5]));
    assert_eq!(first["timestampsMs"], serde_json::json!([0, 40]));

    assert!(db.get_session_detail("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_app_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let session = WorkoutSession::start("overhead press", Utc::now());
    let rep = Repetition::new(&session.id, 0, 0, capture_window(1.0));

    {
        let app = App::open(dir.path()).unwrap();
        assert_eq!(app.db.read_policy(), ReadPolicy::Strict);
        app.db.insert_session(&session).await.unwrap();
        app.db.insert_repetition(&rep).await.unwrap();
        app.settings
            .update(Settings {
                read_policy: ReadPolicy::Lenient,
                ..Settings::default()
            })
            .unwrap();
    }

    let app = App::open(dir.path()).unwrap();
    assert_eq!(app.db.read_policy(), ReadPolicy::Lenient);
    assert_eq!(app.db.path(), dir.path().join("reptrack.sqlite3"));

    let loaded = app.db.get_repetition(&rep.id).await.unwrap().unwrap();
    assert_eq!(loaded.series, rep.series);
}

#[test]
fn test_sample_series_parses_stored_text() {
    let series: SampleSeries<i64> = "[0,40,80]".parse().unwrap();
    assert_eq!(series.as_slice(), &[0, 40, 80]);
    assert!("[0, 40]".parse::<SampleSeries<i64>>().is_err());
}
