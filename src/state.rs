//! Shared application state
//!
//! The state handle is constructed once in `main` and cloned into every
//! handler. There is no process-wide singleton; everything a handler needs
//! travels through this struct.

use std::sync::Arc;

use crate::config::Config;

/// Application state, generic over the store implementation so tests can
/// substitute an in-memory store for the PostgreSQL-backed one.
#[derive(Debug, Clone)]
pub struct AppState<S> {
    config: Arc<Config>,
    store: S,
}

impl<S> AppState<S> {
    /// Create the state handle from loaded configuration and a store
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Persistence handle
    pub fn store(&self) -> &S {
        &self.store
    }
}
