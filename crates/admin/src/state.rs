//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use storedesk_core::MoneyFormat;

use crate::config::AdminConfig;

/// Application state shared across all handlers.
///
/// Cheap to clone: everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the money display settings.
    #[must_use]
    pub fn money(&self) -> &MoneyFormat {
        &self.inner.config.money
    }
}

#[cfg(test)]
impl AppState {
    /// State with default settings and a pool that never connects.
    ///
    /// Must be called inside a Tokio runtime.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn for_tests() -> Self {
        use secrecy::SecretString;
        use sqlx::postgres::PgPoolOptions;

        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/storedesk_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%"),
            money: MoneyFormat::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
            tls: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/storedesk_test")
            .unwrap();

        Self::new(config, pool)
    }
}
