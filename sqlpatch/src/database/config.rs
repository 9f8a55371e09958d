//! Database configuration and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::schema::DEFAULT_PATCH_SAVEPOINT;

/// Configuration for database connections.
///
/// This struct contains all parameters needed to open and patch a database:
/// the file path, lock timeout, access mode, and the savepoint name the
/// patch engine reserves for itself.
///
/// # Examples
///
/// ```
/// use sqlpatch::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/app.db")
///     .with_busy_timeout(Duration::from_millis(10000))
///     .with_patch_savepoint("app_patch");
/// assert_eq!(config.patch_savepoint, "app_patch");
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Whether to automatically create the database if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
    /// Savepoint name used while applying a patch.
    ///
    /// Host code running inside a patch must not open a savepoint with
    /// this name.
    pub patch_savepoint: String,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `auto_create`: true
    /// - `read_only`: false
    /// - `patch_savepoint`: `"patchupdate"`
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/app.db");
    /// assert_eq!(config.path.to_str().unwrap(), "/tmp/app.db");
    /// ```
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
            patch_savepoint: DEFAULT_PATCH_SAVEPOINT.to_string(),
        }
    }

    /// Sets the busy timeout duration.
    ///
    /// The busy timeout determines how long the connection waits on a locked
    /// database before the statement fails.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Configures the database to be opened in read-only mode.
    ///
    /// When read-only is enabled, `auto_create` is automatically disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/app.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }

    /// Sets the savepoint name reserved for patch application.
    ///
    /// The name is validated when patches are applied, not here.
    #[must_use]
    pub fn with_patch_savepoint(mut self, name: impl Into<String>) -> Self {
        self.patch_savepoint = name.into();
        self
    }
}
