//! CLI command implementations.

pub mod avail;
pub mod classmates;
pub mod confirm;
pub mod course;
pub mod profile;
pub mod propose;
pub mod sessions;
pub mod suggest;

use anyhow::{Context, Result};
use buddy_db::Database;

use crate::Config;

/// Opens the configured database, creating its parent directory first.
fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}
