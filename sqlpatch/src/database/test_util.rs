//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};

/// Creates a database in a temporary directory, without applying patches.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Creates a temporary database with the internal patches applied.
///
/// # Panics
///
/// Panics if the database cannot be created or patched.
#[must_use]
pub fn create_patched_test_database() -> Database {
    let db = create_test_database();
    db.apply_patches(&[]).unwrap();
    db
}

/// Counts the rows of a table.
///
/// # Panics
///
/// Panics if the table cannot be queried.
#[must_use]
pub fn count_rows(db: &Database, table: &str) -> i64 {
    db.query_single(&format!("SELECT COUNT(*) FROM {table}"), [])
        .unwrap()
        .unwrap()
}
