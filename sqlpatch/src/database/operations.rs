//! Statement execution helpers and table/index DDL.
//!
//! Every helper attaches the statement text to its error. Prepared
//! statements and row cursors are owned by the helper's scope and released
//! on every exit path.

use rusqlite::types::FromSql;
use rusqlite::{OptionalExtension, Params, Row};

use crate::error::{Error, Result};

use super::connection::Database;
use super::schema::SELECT_TABLE_EXISTS;

impl Database {
    /// Executes a statement with bound parameters.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the statement fails to prepare or run.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Database;
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// db.create_table("notes (id INTEGER PRIMARY KEY, body TEXT)").unwrap();
    /// let changed = db.execute("INSERT INTO notes (body) VALUES (?1)", ["hello"]).unwrap();
    /// assert_eq!(changed, 1);
    /// ```
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        self.conn
            .execute(sql, params)
            .map_err(|source| Error::statement(sql, source))
    }

    /// Runs a query expected to return at most one row and reads its first
    /// column.
    ///
    /// Returns `Ok(None)` when the query yields no rows. Any other failure,
    /// including a missing table, is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the query fails or the value cannot be
    /// converted to `T`.
    pub fn query_single<T: FromSql, P: Params>(&self, sql: &str, params: P) -> Result<Option<T>> {
        self.conn
            .query_row(sql, params, |row| row.get(0))
            .optional()
            .map_err(|source| Error::statement(sql, source))
    }

    /// Runs a query and calls `action` for each returned row.
    ///
    /// Iteration stops at the first error, which is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the query fails, or the first error
    /// returned by `action`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Database;
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// db.create_table("nums (n INTEGER)").unwrap();
    /// db.execute("INSERT INTO nums VALUES (1), (2), (3)", []).unwrap();
    ///
    /// let mut total = 0;
    /// db.query_each("SELECT n FROM nums", [], |row| {
    ///     total += row.get::<_, i64>(0)?;
    ///     Ok(())
    /// })
    /// .unwrap();
    /// assert_eq!(total, 6);
    /// ```
    pub fn query_each<P, F>(&self, sql: &str, params: P, mut action: F) -> Result<()>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> Result<()>,
    {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|source| Error::statement(sql, source))?;
        let mut rows = stmt
            .query(params)
            .map_err(|source| Error::statement(sql, source))?;
        while let Some(row) = rows.next().map_err(|source| Error::statement(sql, source))? {
            action(row)?;
        }
        Ok(())
    }

    /// Creates a table from its definition: everything after `CREATE TABLE`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the table already exists or the
    /// definition is invalid.
    pub fn create_table(&self, table_def: &str) -> Result<()> {
        self.execute(&format!("CREATE TABLE {table_def}"), [])?;
        Ok(())
    }

    /// Drops a table. Dropping a table that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the drop fails for another reason.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.execute(&format!("DROP TABLE IF EXISTS {name}"), [])?;
        Ok(())
    }

    /// Creates an index from its definition: everything after `CREATE INDEX`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the index exists, or the indexed table
    /// or column does not.
    pub fn create_index(&self, index_def: &str) -> Result<()> {
        self.execute(&format!("CREATE INDEX {index_def}"), [])?;
        Ok(())
    }

    /// Drops an index.
    ///
    /// Unlike [`Database::drop_table`], dropping a missing index is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the index does not exist.
    pub fn drop_index(&self, name: &str) -> Result<()> {
        self.execute(&format!("DROP INDEX {name}"), [])?;
        Ok(())
    }

    /// Returns whether a table with the given name exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the schema cannot be queried.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<i64> = self.query_single(SELECT_TABLE_EXISTS, [name])?;
        Ok(found.is_some())
    }
}
