pub mod api;
pub mod config;
pub mod db;
pub mod engine;

pub use db::DbPool;

use config::Config;

use crate::api::auth::SessionStore;

pub struct AppState {
    pub config: Config,
    pub store: DbPool,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, store: DbPool) -> Self {
        let sessions = SessionStore::new(config.auth.session_ttl_hours);
        Self {
            config,
            store,
            sessions,
        }
    }
}
