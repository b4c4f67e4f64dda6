//! Shared application state: stores, auth keys and media settings.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use monastery_core::{InMemoryDocumentationStore, InMemoryMonasteryStore, sample};

use crate::auth::{AuthKeys, UserStore};
use crate::config::ApiConfig;

/// Principal monasteries surfaced by the featured listing.
pub const FEATURED_IDS: [u32; 6] = [1, 2, 3, 4, 7, 8];

#[derive(Clone, Debug)]
pub struct MediaSettings {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

pub struct AppState {
    pub monasteries: RwLock<InMemoryMonasteryStore>,
    pub docs: RwLock<InMemoryDocumentationStore>,
    pub users: RwLock<UserStore>,
    pub auth: AuthKeys,
    pub media: MediaSettings,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// State seeded with the built-in dataset and documentation entries.
    pub fn seeded(config: &ApiConfig) -> anyhow::Result<SharedState> {
        let now = Utc::now().timestamp_millis();
        let monasteries = InMemoryMonasteryStore::from_records(sample()?, &FEATURED_IDS, now)?;
        let docs = InMemoryDocumentationStore::seeded()?;

        Ok(Arc::new(Self {
            monasteries: RwLock::new(monasteries),
            docs: RwLock::new(docs),
            users: RwLock::new(UserStore::new()),
            auth: AuthKeys::from_config(config),
            media: MediaSettings {
                upload_dir: config.upload_dir.clone(),
                max_upload_bytes: config.max_upload_bytes,
            },
        }))
    }
}
