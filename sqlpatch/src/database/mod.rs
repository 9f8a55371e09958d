//! Database layer: connections, transactions, savepoints and run-once
//! patches.
//!
//! # Examples
//!
//! ```no_run
//! use sqlpatch::database::{Database, DatabaseConfig, Patch};
//!
//! let patches = [
//!     Patch::new(1, |db| {
//!         db.create_table("tasks (id INTEGER PRIMARY KEY, title TEXT NOT NULL)")?;
//!         Ok(())
//!     }),
//!     Patch::new(2, |db| {
//!         db.execute("INSERT INTO tasks (id, title) VALUES (0, 'welcome')", [])?;
//!         Ok(())
//!     }),
//! ];
//!
//! let config = DatabaseConfig::new("/tmp/tasks.db");
//! let (db, patched) = Database::open_and_patch(config, &patches).unwrap();
//! patched.unwrap();
//!
//! let id = db.next_unique_key().unwrap();
//! db.execute(
//!     "INSERT INTO tasks (id, title) VALUES (?1, ?2)",
//!     rusqlite::params![id, "write docs"],
//! )
//! .unwrap();
//! ```

mod config;
mod connection;
mod operations;
mod patches;
mod schema;
mod transaction;
mod unique_key;

#[cfg(test)]
pub(crate) mod test_util;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export public API
pub use config::DatabaseConfig;
pub use connection::Database;
pub use patches::Patch;
pub use schema::DEFAULT_PATCH_SAVEPOINT;
pub use transaction::validate_savepoint_name;
