//! SupernovaForge Storage Layer
//!
//! SQLite-backed durable local storage. The settings table doubles as the
//! key-value store that mirrors the wallet session across restarts.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
