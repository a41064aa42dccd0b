//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::session::ShopperSession;
use crate::storage::Storage;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the catalog and the shopper session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    session: Mutex<ShopperSession>,
}

impl AppState {
    /// Create a new application state, opening the shopper session against
    /// `storage`.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, storage: Arc<dyn Storage>) -> Self {
        let session = ShopperSession::open(storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                session: Mutex::new(session),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Lock the shopper session.
    ///
    /// Never hold the guard across an `.await`. A poisoned lock is recovered:
    /// the session is plain data and every store transition is atomic.
    pub fn session(&self) -> MutexGuard<'_, ShopperSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the session's cart and favorites to storage.
    pub fn flush(&self) {
        self.session().flush();
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("products", &self.inner.catalog.all().len())
            .finish_non_exhaustive()
    }
}
