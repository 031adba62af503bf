pub mod repetitions;
pub mod workout_sessions;
