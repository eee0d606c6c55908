//! Engine configuration loaded from TOML.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::db::SqlitePersister;
use crate::error::GameError;
use crate::persister::{InMemoryPersister, SeedSource, StatePersister};

/// Where games are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// In process memory, lost on exit.
    #[default]
    Memory,
    /// In a SQLite database file.
    Sqlite {
        /// Path of the database file.
        path: String,
    },
}

/// Settings for creating and storing games.
///
/// ```toml
/// chat_log_length = 8
/// action_log_length = 8
/// seed = 42
///
/// [storage]
/// kind = "sqlite"
/// path = "hanabi.db"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct EngineConfig {
    /// Number of chat lines each game keeps.
    #[serde(default = "default_log_length")]
    chat_log_length: usize,

    /// Number of action records each game keeps.
    #[serde(default = "default_log_length")]
    action_log_length: usize,

    /// Fixed seed for reproducible deals. Drawn from entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Storage backing.
    #[serde(default)]
    storage: StorageConfig,
}

fn default_log_length() -> usize {
    8
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chat_log_length: default_log_length(),
            action_log_length: default_log_length(),
            seed: None,
            storage: StorageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file. Missing keys take their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(storage = ?config.storage, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Seed source for new decks: fixed if `seed` is set, otherwise entropy.
    pub fn seed_source(&self) -> SeedSource {
        match self.seed {
            Some(seed) => SeedSource::from_seed(seed),
            None => SeedSource::from_entropy(),
        }
    }

    /// Opens the configured persister.
    ///
    /// # Errors
    ///
    /// Returns a `Storage` error if the SQLite database cannot be opened.
    #[instrument(skip(self), fields(storage = ?self.storage))]
    pub fn open_persister(&self) -> Result<Box<dyn StatePersister>, GameError> {
        let seeds = self.seed_source();
        match &self.storage {
            StorageConfig::Memory => Ok(Box::new(InMemoryPersister::new(seeds))),
            StorageConfig::Sqlite { path } => {
                Ok(Box::new(SqlitePersister::open(path.clone(), seeds)?))
            }
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
