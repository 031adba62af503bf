//! SQLite-backed store for workout sessions and their repetitions.

pub mod connection;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod schema;

pub use connection::Database;
