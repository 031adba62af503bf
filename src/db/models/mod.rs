pub mod repetition;
pub mod workout_session;

pub use repetition::{RepSeries, Repetition};
pub use workout_session::{SessionDetail, SessionStatus, WorkoutSession};
