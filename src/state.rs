use std::sync::Arc;

use redis::aio::ConnectionManager;

use crate::config::Config;
use crate::error::Result;
use crate::graphql::{self, AppSchema};
use crate::repositories::session::{RedisSessionStore, SessionStore};
use crate::repositories::transaction::{PgTransactionStore, TransactionStore};
use crate::repositories::user::{PgUserStore, UserStore};

/// The application's state: the three stores, the configuration, and the
/// GraphQL schema built once at startup.
#[derive(Clone)]
pub struct AppState {
    /// The user store.
    pub users: Arc<dyn UserStore>,
    /// The session store.
    pub sessions: Arc<dyn SessionStore>,
    /// The transaction store.
    pub transactions: Arc<dyn TransactionStore>,
    /// The application's configuration.
    pub config: Config,
    /// The GraphQL schema.
    pub schema: AppSchema,
}

impl AppState {
    /// Creates the production `AppState`: PostgreSQL-backed user and
    /// transaction stores, a Redis-backed session store.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL pool initialized with deadpool-postgres");

        let redis_client = redis::Client::open(config.redis_url.as_str())?;
        let redis = ConnectionManager::new(redis_client).await?;
        tracing::info!("✅ Redis connection manager initialized (pooled)");

        Ok(Self::from_parts(
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(RedisSessionStore::new(redis)),
            Arc::new(PgTransactionStore::new(db)),
            config.clone(),
        ))
    }

    /// Assembles an `AppState` from explicit store implementations. The
    /// hermetic tests use this with the in-memory stores.
    pub fn from_parts(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        transactions: Arc<dyn TransactionStore>,
        config: Config,
    ) -> Self {
        AppState {
            users,
            sessions,
            transactions,
            config,
            schema: graphql::build_schema(),
        }
    }
}
