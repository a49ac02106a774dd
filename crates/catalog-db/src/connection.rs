//! # Connection Provider
//!
//! Opens one SQLite connection per repository call.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Per-Call Connection Lifecycle                      │
//! │                                                                         │
//! │  ProductRepository::find_all()                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ConnectionProvider::connect("find_all") ← fresh SqliteConnection      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ Session                                  │                           │
//! │  │   conn() ──► execute / fetch             │                           │
//! │  │   finish(result) ──► close + log         │                           │
//! │  │   (drop) ──► connection released         │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbResult<T> back to the caller                                        │
//! │                                                                         │
//! │  No pool: nothing outlives the call except the immutable DbConfig.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, error, warn};

use crate::error::{DbError, DbResult};

/// Scheme token every connection string starts with.
pub const SCHEME: &str = "sqlite://";

/// Prefixes the store scheme unless the address already carries one.
///
/// ## Example
/// ```rust
/// use catalog_db::connection::normalize_address;
///
/// assert_eq!(normalize_address("data/catalog.db"), "sqlite://data/catalog.db");
/// assert_eq!(normalize_address("sqlite://data/catalog.db"), "sqlite://data/catalog.db");
/// assert_eq!(normalize_address("sqlite::memory:"), "sqlite::memory:");
/// ```
pub fn normalize_address(address: &str) -> String {
    if address.starts_with("sqlite:") {
        address.to_string()
    } else {
        format!("{SCHEME}{address}")
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Username/password pair handed to the connection provider.
///
/// SQLite does not authenticate, so these are carried for collaborators
/// that persist them. The password never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection parameters, immutable once the repository is built.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("./catalog.db", Credentials::new("sa", ""))
///     .create_if_missing(true)
///     .busy_timeout(Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Normalized connection string.
    address: String,

    pub credentials: Credentials,

    /// Create the database file on connect when it does not exist.
    /// Default: false
    pub create_if_missing: bool,

    /// How long a statement waits on a locked database.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Enforce foreign key constraints.
    /// Default: true (SQLite has them off by default)
    pub foreign_keys: bool,
}

impl DbConfig {
    /// Creates a configuration, normalizing `address`.
    pub fn new(address: impl AsRef<str>, credentials: Credentials) -> Self {
        DbConfig {
            address: normalize_address(address.as_ref()),
            credentials,
            create_if_missing: false,
            busy_timeout: Duration::from_secs(5),
            foreign_keys: true,
        }
    }

    /// Sets whether the database file may be created on connect.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Sets the busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether foreign keys are enforced.
    pub fn foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    /// The normalized connection string.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&self.address)?
            // WAL: readers don't block the writer across concurrent calls
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(self.foreign_keys)
            .busy_timeout(self.busy_timeout)
            .create_if_missing(self.create_if_missing);
        Ok(options)
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Opens sessions against the configured store.
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: DbConfig,
}

impl ConnectionProvider {
    pub fn new(config: DbConfig) -> Self {
        ConnectionProvider { config }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Opens a new session for `operation`.
    ///
    /// ## Returns
    /// * `Ok(Session)` - Connection ready, released when the session is dropped
    /// * `Err(DbError::ConnectionFailed)` - Address invalid or store unreachable
    pub async fn connect(&self, operation: &'static str) -> DbResult<Session> {
        let address = self.config.address();
        debug!(
            operation,
            address,
            username = %self.config.credentials.username,
            "Opening connection"
        );

        let opened = match self.config.connect_options() {
            Ok(options) => SqliteConnection::connect_with(&options).await,
            Err(e) => Err(e),
        };

        match opened {
            Ok(conn) => Ok(Session { conn, operation }),
            Err(e) => {
                error!(operation, address, error = %e, "Database connection error");
                Err(DbError::connection(address, e))
            }
        }
    }

    /// Checks that a session can be opened and can execute a query.
    pub async fn health_check(&self) -> bool {
        let Ok(mut session) = self.connect("health_check").await else {
            return false;
        };
        let result = sqlx::query("SELECT 1").execute(session.conn()).await;
        session.finish(result).await.is_ok()
    }
}

// =============================================================================
// Session
// =============================================================================

/// One open connection, scoped to a single repository call.
///
/// Dropping the session releases the connection on every exit path.
/// [`Session::finish`] and [`Session::close`] shut it down in order; both
/// consume the session, so it cannot be closed twice.
#[derive(Debug)]
pub struct Session {
    conn: SqliteConnection,
    operation: &'static str,
}

impl Session {
    /// The underlying connection, usable as an executor.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// The operation this session was opened for.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Closes the connection. A failure to close is logged, not returned.
    pub async fn close(self) {
        let operation = self.operation;
        if let Err(e) = self.conn.close().await {
            warn!(operation, error = %e, "Failed to close connection cleanly");
        }
    }

    /// Closes the session and converts a driver result into a [`DbResult`].
    ///
    /// Failures are logged here, once, with the operation name.
    pub async fn finish<T>(self, result: Result<T, sqlx::Error>) -> DbResult<T> {
        let operation = self.operation;
        self.close().await;

        result.map_err(|e| {
            let err = DbError::from(e);
            warn!(operation, error = %err, "Database operation failed");
            err
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
