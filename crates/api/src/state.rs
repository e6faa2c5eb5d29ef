//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::geo::Geocoder;
use crate::matcher::RestaurantMatcher;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and the restaurant matcher
/// (which owns the process-wide coordinate cache).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    matcher: RestaurantMatcher<Geocoder>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API server configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let matcher = RestaurantMatcher::new(Geocoder::new(config.geocoder.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                matcher,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the restaurant matcher.
    #[must_use]
    pub fn matcher(&self) -> &RestaurantMatcher<Geocoder> {
        &self.inner.matcher
    }
}
