//! Subcommand implementations.

pub mod categories;
pub mod history;
pub mod init;
pub mod play;
pub mod profile;
pub mod questions;
pub mod stats;
pub mod transfer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use trivia_providers::config::{load_config_from, TriviaConfig};
use trivia_store::TriviaStore;

/// Global options shared by every subcommand.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Context {
    pub fn config(&self) -> Result<TriviaConfig> {
        let mut config = load_config_from(self.config_path.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }

    pub fn store(&self) -> Result<Arc<TriviaStore>> {
        let config = self.config()?;
        Ok(Arc::new(open_store(&config)))
    }
}

pub fn open_store(config: &TriviaConfig) -> TriviaStore {
    tracing::debug!(dir = %config.data_dir.display(), "opening data directory");
    TriviaStore::open(&config.data_dir)
}
