//! Transaction and savepoint primitives.
//!
//! Transactions are plain `BEGIN`/`COMMIT`/`ROLLBACK` statements issued on
//! the handle, so they compose with savepoints opened by patches and by host
//! code. Savepoints nest as a strict stack inside the open transaction; a
//! savepoint opened outside any transaction starts one, and releasing it
//! commits.
//!
//! The `*_on_no_error` combinators and closure runners are generic over the
//! caller's error type, so host code can keep its own error type as long as
//! it converts from [`Error`].

use crate::error::{Error, Result};

use super::connection::Database;

const BEGIN: &str = "BEGIN";
const COMMIT: &str = "COMMIT";
const ROLLBACK: &str = "ROLLBACK";

/// Checks that a savepoint name can be interpolated into SQL as-is.
///
/// # Errors
///
/// Returns [`Error::InvalidSavepointName`] unless the name is a plain
/// identifier: an ASCII letter or underscore followed by ASCII letters,
/// digits or underscores.
pub fn validate_savepoint_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidSavepointName {
            name: name.to_string(),
        })
    }
}

impl Database {
    /// Begins a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if a transaction is already open or the
    /// database is locked.
    pub fn begin_trans(&self) -> Result<()> {
        self.execute(BEGIN, [])?;
        Ok(())
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if no transaction is open or the commit
    /// fails.
    pub fn commit_trans(&self) -> Result<()> {
        self.execute(COMMIT, [])?;
        Ok(())
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if no transaction is open.
    pub fn rollback_trans(&self) -> Result<()> {
        self.execute(ROLLBACK, [])?;
        Ok(())
    }

    /// Commits the transaction if `success` is true, otherwise rolls it back.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever statement was issued.
    pub fn commit_on_success(&self, success: bool) -> Result<()> {
        if success {
            self.commit_trans()
        } else {
            self.rollback_trans()
        }
    }

    /// Commits the transaction if `result` is `Ok`, otherwise rolls it back.
    ///
    /// On `Ok` the value is passed through once the commit succeeds. If the
    /// commit itself fails the transaction is rolled back and the commit
    /// error returned. On `Err` the original error is returned; a failed
    /// rollback is logged and never replaces it.
    ///
    /// # Errors
    ///
    /// Returns the original error, or the commit error.
    pub fn commit_on_no_error<T, E>(
        &self,
        result: std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<Error>,
    {
        match result {
            Ok(value) => {
                if let Err(commit_err) = self.commit_trans() {
                    self.rollback_trans_quietly();
                    return Err(commit_err.into());
                }
                Ok(value)
            }
            Err(err) => {
                self.rollback_trans_quietly();
                Err(err)
            }
        }
    }

    /// Runs `body` inside a transaction, committing if it returns `Ok` and
    /// rolling back otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started, the error
    /// returned by `body`, or the commit error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::{Database, Error};
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// db.create_table("items (name TEXT)").unwrap();
    ///
    /// let result = db.exec_in_transaction(|db| -> Result<(), Error> {
    ///     db.execute("INSERT INTO items VALUES ('kept?')", [])?;
    ///     Err(Error::NotFound { resource: "something".into() })
    /// });
    /// assert!(result.is_err());
    ///
    /// let count: Option<i64> = db.query_single("SELECT COUNT(*) FROM items", []).unwrap();
    /// assert_eq!(count, Some(0));
    /// ```
    pub fn exec_in_transaction<T, E, F>(&self, body: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&Self) -> std::result::Result<T, E>,
    {
        self.begin_trans()?;
        let result = body(self);
        self.commit_on_no_error(result)
    }

    /// Returns whether a transaction is currently open on this handle.
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Opens a savepoint inside the current transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSavepointName`] for a name that is not a plain
    /// identifier, or [`Error::Statement`] if the statement fails.
    pub fn create_savepoint(&self, name: &str) -> Result<()> {
        validate_savepoint_name(name)?;
        self.execute(&format!("SAVEPOINT {name}"), [])?;
        Ok(())
    }

    /// Releases a savepoint, merging its changes into the parent transaction.
    ///
    /// Releasing the outermost savepoint when no `BEGIN` is active commits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSavepointName`] or [`Error::Statement`], for
    /// example when no savepoint with this name is open.
    pub fn commit_savepoint(&self, name: &str) -> Result<()> {
        validate_savepoint_name(name)?;
        self.execute(&format!("RELEASE SAVEPOINT {name}"), [])?;
        Ok(())
    }

    /// Undoes everything since the savepoint was opened, then releases it.
    ///
    /// Rolling back to a savepoint leaves it open, so it is released
    /// afterwards. If the rollback fails the release is not attempted.
    /// The enclosing transaction stays open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSavepointName`] or the error of the first
    /// statement that failed.
    pub fn rollback_savepoint(&self, name: &str) -> Result<()> {
        validate_savepoint_name(name)?;
        self.execute(&format!("ROLLBACK TO SAVEPOINT {name}"), [])?;
        self.commit_savepoint(name)
    }

    /// Releases the savepoint if `success` is true, otherwise rolls it back.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever operation was performed.
    pub fn commit_savepoint_on_success(&self, name: &str, success: bool) -> Result<()> {
        if success {
            self.commit_savepoint(name)
        } else {
            self.rollback_savepoint(name)
        }
    }

    /// Releases the savepoint if `result` is `Ok`, otherwise rolls it back.
    ///
    /// Mirrors [`Database::commit_on_no_error`]: rollback failures are logged
    /// and never mask the original error.
    ///
    /// # Errors
    ///
    /// Returns the original error, or the release error.
    pub fn commit_savepoint_on_no_error<T, E>(
        &self,
        name: &str,
        result: std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<Error>,
    {
        match result {
            Ok(value) => {
                if let Err(release_err) = self.commit_savepoint(name) {
                    self.rollback_savepoint_quietly(name);
                    return Err(release_err.into());
                }
                Ok(value)
            }
            Err(err) => {
                self.rollback_savepoint_quietly(name);
                Err(err)
            }
        }
    }

    /// Runs `body` inside a savepoint, releasing it if `body` returns `Ok`
    /// and rolling it back otherwise.
    ///
    /// This is the entry point for "run this unit of work atomically"
    /// inside whatever transaction is already open. Outside a transaction
    /// the savepoint behaves like `BEGIN`/`COMMIT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the savepoint cannot be opened, the error
    /// returned by `body`, or the release error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Database;
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// db.create_table("items (name TEXT)").unwrap();
    ///
    /// db.begin_trans().unwrap();
    /// let inserted = db
    ///     .exec_with_savepoint("add_item", |db| db.execute("INSERT INTO items VALUES ('a')", []))
    ///     .unwrap();
    /// assert_eq!(inserted, 1);
    /// db.commit_trans().unwrap();
    /// ```
    pub fn exec_with_savepoint<T, E, F>(&self, name: &str, body: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&Self) -> std::result::Result<T, E>,
    {
        self.create_savepoint(name)?;
        let result = body(self);
        self.commit_savepoint_on_no_error(name, result)
    }

    fn rollback_trans_quietly(&self) {
        if let Err(err) = self.rollback_trans() {
            log::error!("transaction rollback failed: {err}");
        }
    }

    fn rollback_savepoint_quietly(&self, name: &str) {
        if let Err(err) = self.rollback_savepoint(name) {
            log::error!("rollback to savepoint {name} failed: {err}");
        }
    }
}
