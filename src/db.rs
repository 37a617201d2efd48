use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Error as PoolError, Pool};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// How long a connection waits for the SQLite write lock before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Applies per-connection pragmas when the pool opens a connection
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, PoolError> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), PoolError> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(PoolError::QueryError)
    }
}

/// Builds the connection pool for `database_url`
///
/// Every pooled connection enforces foreign keys and waits on a locked
/// database instead of failing immediately.
///
/// ### Errors
///
/// Returns an error if the initial connections cannot be opened
pub fn init_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions {
            busy_timeout: BUSY_TIMEOUT,
        }))
        .build(manager)?;
    Ok(pool)
}
