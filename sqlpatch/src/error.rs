//! Error types for the sqlpatch library.
//!
//! This module provides the error hierarchy for every operation in the
//! library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a sqlpatch error.
///
/// # Examples
///
/// ```
/// use sqlpatch::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(1)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the sqlpatch library.
#[derive(Debug, Error)]
pub enum Error {
    /// The database file could not be opened or closed.
    #[error("cannot open database {}: {source}", path.display())]
    Connection {
        /// Path of the database file.
        path: PathBuf,
        /// The underlying driver error.
        #[source]
        source: rusqlite::Error,
    },

    /// A SQL statement failed to prepare or execute.
    #[error("statement failed `{sql}`: {source}")]
    Statement {
        /// The statement text that failed.
        sql: String,
        /// The underlying driver error.
        #[source]
        source: rusqlite::Error,
    },

    /// A patch could not be applied. Its writes have been rolled back.
    #[error("patch {id} failed: {source}")]
    Patch {
        /// The id of the failing patch.
        id: i64,
        /// What went wrong while applying or recording the patch.
        #[source]
        source: anyhow::Error,
    },

    /// A single-row lookup found nothing.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The unique key row changed between reading and incrementing it.
    #[error("unique key {observed} was modified concurrently")]
    KeyConflict {
        /// The key value read before the update.
        observed: i64,
    },

    /// A savepoint name is not a plain SQL identifier.
    #[error("invalid savepoint name '{name}'")]
    InvalidSavepointName {
        /// The rejected name.
        name: String,
    },

    /// A database error occurred while decoding a row.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::Statement`] for the given SQL text.
    pub(crate) fn statement(sql: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Statement {
            sql: sql.into(),
            source,
        }
    }

    /// Returns the patch id if this error came from a failed patch.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Error;
    ///
    /// let err = Error::Patch { id: 7, source: anyhow::anyhow!("boom") };
    /// assert_eq!(err.patch_id(), Some(7));
    /// ```
    #[must_use]
    pub fn patch_id(&self) -> Option<i64> {
        match self {
            Self::Patch { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Check if error indicates a missing row.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Error;
    ///
    /// let err = Error::NotFound { resource: "gkey row".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
