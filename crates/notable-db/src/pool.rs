//! Connection pool setup.
//!
//! The pool is sized from the environment at startup; a small CRUD service
//! needs only a handful of connections, so the tunable surface is max/min
//! connections and the acquire timeout.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use notable_core::{Error, Result};

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default acquire timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Pool sizing options.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to keep open.
    pub min_connections: u32,
    /// How long to wait when acquiring a connection.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: 1,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the environment.
    ///
    /// Reads `DATABASE_MAX_CONNECTIONS`, `DATABASE_MIN_CONNECTIONS`, and
    /// `DATABASE_CONNECT_TIMEOUT_SECS`; variables left unset keep their
    /// defaults, a value that does not parse is a configuration error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(n) = env_u32("DATABASE_MAX_CONNECTIONS")? {
            config.max_connections = n;
        }
        if let Some(n) = env_u32("DATABASE_MIN_CONNECTIONS")? {
            config.min_connections = n;
        }
        if let Some(secs) = env_u32("DATABASE_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = Duration::from_secs(u64::from(secs));
        }
        Ok(config)
    }

    /// Set the maximum number of connections.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Set the minimum number of connections.
    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n;
        self
    }

    /// Set the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

fn parse_u32(name: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be an integer, got {:?}", name, raw)))
}

fn env_u32(name: &str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(raw) => parse_u32(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

/// Create a new PostgreSQL connection pool with default configuration.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

/// Create a new PostgreSQL connection pool with custom configuration.
pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "established",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        pool_size = pool.size(),
        pool_idle = pool.num_idle(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}
