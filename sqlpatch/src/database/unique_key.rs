//! Durable unique key generator backed by the `gkey` table.

use crate::error::{Error, Result};

use super::connection::Database;
use super::schema::{INCREMENT_NEXT_KEY, SELECT_NEXT_KEY};

impl Database {
    /// Returns the next unique key and advances the counter.
    ///
    /// Keys start at 1 on a freshly patched database and increase by one per
    /// call, across process restarts. The read and the increment commit in
    /// one transaction: a key is only returned once its increment is durable.
    ///
    /// Must be called outside any open transaction. Patch actions run inside
    /// the patch savepoint, so they cannot allocate keys.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::Statement`] for the `BEGIN` statement if a transaction or
    ///   savepoint is already open, including inside a patch action
    /// - [`Error::Statement`] if the `gkey` table is missing (database not
    ///   patched)
    /// - [`Error::NotFound`] if the `gkey` row is missing
    /// - [`Error::KeyConflict`] if the row changed between read and update
    ///
    /// The transaction is rolled back on every error.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlpatch::Database;
    ///
    /// let db = Database::open_in_memory().unwrap();
    /// db.apply_patches(&[]).unwrap();
    /// assert_eq!(db.next_unique_key().unwrap(), 1);
    /// assert_eq!(db.next_unique_key().unwrap(), 2);
    /// ```
    pub fn next_unique_key(&self) -> Result<i64> {
        self.exec_in_transaction(|db| -> Result<i64> {
            let observed: i64 = db
                .query_single(SELECT_NEXT_KEY, [])?
                .ok_or_else(|| Error::NotFound {
                    resource: "unique key row in gkey".into(),
                })?;

            if db.execute(INCREMENT_NEXT_KEY, [observed])? != 1 {
                return Err(Error::KeyConflict { observed });
            }
            Ok(observed)
        })
    }
}
