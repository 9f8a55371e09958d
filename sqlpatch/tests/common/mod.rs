//! Common test utilities for integration tests.
//!
//! This module provides a temporary database fixture and small query
//! helpers shared by the integration test files.

use std::path::PathBuf;

use sqlpatch::{Database, DatabaseConfig};
use tempfile::TempDir;

/// A database file inside a temporary directory.
///
/// The directory (and the file) is removed when the fixture is dropped, so
/// keep the fixture alive for as long as the test reopens the file.
pub struct TestDb {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path of the database file.
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestDb {
    /// Creates a fixture; the database file does not exist yet.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("TestDb");
        Self { temp_dir, path }
    }

    /// Configuration for this fixture's database file.
    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.path)
    }

    /// Opens the database without applying patches.
    pub fn open(&self) -> Database {
        Database::open(self.config()).expect("Failed to open test database")
    }

    /// Opens the database and applies only the internal patches.
    pub fn open_patched(&self) -> Database {
        let (db, patched) =
            Database::open_and_patch(self.config(), &[]).expect("Failed to open test database");
        patched.expect("Failed to patch test database");
        db
    }
}

/// Counts the rows of a table.
#[allow(dead_code)]
pub fn count_rows(db: &Database, table: &str) -> i64 {
    db.query_single(&format!("SELECT COUNT(*) FROM {table}"), [])
        .unwrap()
        .unwrap()
}
