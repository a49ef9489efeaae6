//! glossary-manager - A local web API for a personal glossary
//!
//! This crate stores terms, uploaded images, and equation snippets as flat
//! JSON files, with:
//! - Write-to-temp-then-rename persistence (a reader never sees a partial file)
//! - Timestamped rolling backups before every overwrite
//! - One-time migration of legacy term records at load time
//! - REST API with multipart image upload

pub mod api;
pub mod asset_store;
pub mod config;
pub mod importer;
pub mod store;

use asset_store::AssetStore;
use config::Config;
use store::{JsonStore, TermStore};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub terms: TermStore,
    pub images: JsonStore,
    pub equations: JsonStore,
    pub assets: AssetStore,
}
