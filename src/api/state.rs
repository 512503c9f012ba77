use std::sync::Arc;

use crate::{
    config::Config,
    db::{CatalogStore, InMemoryCatalog, InMemorySessions, InMemoryUsers, SessionStore, UserStore},
    models::{session::ttl_from_secs, Movie},
    services::DEFAULT_TOP_N,
};

/// Per-deployment tunables used by the handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Recommendations returned per request
    pub recommendation_count: usize,
    /// Random movies offered for rating
    pub sample_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recommendation_count: DEFAULT_TOP_N,
            sample_size: 5,
        }
    }
}

impl From<&Config> for Settings {
    fn from(config: &Config) -> Self {
        Self {
            recommendation_count: config.recommendation_count,
            sample_size: config.sample_size,
        }
    }
}

/// Shared application state
///
/// Holds only the store handles; nothing user-specific lives here. The
/// logged-in user travels with each request as a [`super::CurrentUser`].
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        settings: Settings,
    ) -> Self {
        Self {
            catalog,
            users,
            sessions,
            settings,
        }
    }

    /// State backed entirely by in-memory stores, seeded with `movies`
    pub fn in_memory(movies: Vec<Movie>, settings: Settings) -> Self {
        Self::new(
            Arc::new(InMemoryCatalog::new(movies)),
            Arc::new(InMemoryUsers::new()),
            Arc::new(InMemorySessions::new(ttl_from_secs(24 * 60 * 60))),
            settings,
        )
    }
}
