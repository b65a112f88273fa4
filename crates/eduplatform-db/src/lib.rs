//! # EduPlatform DB
//!
//! PostgreSQL connection pool construction for the EduPlatform API.
//!
//! The pool is built once at startup from an explicit URL and injected into
//! the application state; nothing in the workspace reaches for a global
//! connection.
//!
//! # Example
//!
//! ```ignore
//! use eduplatform_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = init_db_pool(&server_config.database_url).await?;
//!     // hand `pool` to AppState
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

pub const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects a PostgreSQL pool and verifies one connection can be acquired.
///
/// # Errors
///
/// Returns the underlying [`sqlx::Error`] when the URL is malformed or the
/// server is unreachable.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options().connect(database_url).await?;
    info!(max_connections = MAX_CONNECTIONS, "Connected to PostgreSQL");
    Ok(pool)
}

/// Builds a pool that connects on first use. Used where a pool is needed
/// but no query will run, e.g. router tests that stop at the auth layer.
pub fn lazy_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    pool_options().connect_lazy(database_url)
}

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}
