//! Local data core for the rep tracker.
//!
//! Per-repetition sample curves are stored as compact text through
//! [`codec`], inside a SQLite workout store ([`db`]). [`App::open`] wires
//! settings, logging and the store together for a data directory.

pub mod codec;
pub mod db;
pub mod settings;
mod utils;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;

pub use codec::{decode, encode, CodecError, Sample, SampleSeries};
pub use db::models::{RepSeries, Repetition, SessionDetail, SessionStatus, WorkoutSession};
pub use db::Database;
pub use settings::{ReadPolicy, Settings, SettingsStore};

const SETTINGS_FILE: &str = "settings.json";

/// Initializes `env_logger` at `level`; `RUST_LOG` overrides it.
///
/// Returns false if a logger was already installed.
pub fn init_logging(level: LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok()
}

pub struct App {
    pub db: Database,
    pub settings: SettingsStore,
    data_dir: PathBuf,
}

impl App {
    /// Opens (or creates) the app state stored under `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("failed to create data directory {}", data_dir.display())
        })?;

        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
        let current = settings.get();
        init_logging(current.level_filter()?);

        log::info!("Opening rep tracker data in {}", data_dir.display());

        let db = Database::new(data_dir.join(&current.database_file))?
            .with_read_policy(current.read_policy);

        Ok(Self {
            db,
            settings,
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
