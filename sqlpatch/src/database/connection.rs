//! Database connection management.
//!
//! This module provides the [`Database`] handle, which owns one `SQLite`
//! connection and applies the PRAGMA settings every handle relies on.

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A database connection wrapper with configuration.
///
/// The handle is used by one logical writer at a time. It is `Send` but not
/// `Sync`; callers that share it across threads must serialize access.
///
/// # Examples
///
/// ```no_run
/// use sqlpatch::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/app.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    pub(super) config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Open the database with appropriate flags
    /// - Set WAL mode and configure the busy timeout
    ///
    /// No patches are applied; see [`Database::open_and_patch`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - The database file cannot be opened
    /// - PRAGMA settings cannot be applied
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn =
            Connection::open_with_flags(&config.path, flags).map_err(|source| Error::Connection {
                path: config.path.clone(),
                source,
            })?;

        // journal_mode reports the resulting mode as a row
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|source| Error::Connection {
                path: config.path.clone(),
                source,
            })?;
        let pragmas = format!(
            "PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = {};",
            config.busy_timeout.as_millis()
        );
        conn.execute_batch(&pragmas)
            .map_err(|source| Error::statement(pragmas.as_str(), source))?;

        log::debug!("opened database {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Opens a private in-memory database with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot allocate the database.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Database;
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// db.apply_patches(&[]).unwrap();
    /// assert_eq!(db.next_unique_key().unwrap(), 1);
    /// ```
    pub fn open_in_memory() -> Result<Self> {
        let config = DatabaseConfig::new(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| Error::Connection {
            path: config.path.clone(),
            source,
        })?;
        Ok(Self { conn, config })
    }

    /// Closes the connection, reporting any error `SQLite` raises while
    /// finalizing it.
    ///
    /// Dropping a `Database` also closes it, silently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the connection could not be closed.
    pub fn close(self) -> Result<()> {
        let path = self.config.path;
        self.conn
            .close()
            .map_err(|(_, source)| Error::Connection { path, source })
    }

    /// Returns the configuration this handle was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    ///
    /// Patch actions may use it for statements the helper methods don't
    /// cover.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
