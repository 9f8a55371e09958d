#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # sqlpatch
//!
//! Run-once patches, savepoints and durable unique keys for `SQLite`
//! databases.
//!
//! A host declares an ordered list of [`Patch`]es. [`Database::apply_patches`]
//! runs each one at most once per database file, inside its own savepoint,
//! and records its id in a `version` table in the same atomic step. A patch
//! that fails leaves no trace and is retried on the next run.
//!
//! ## Core Types
//!
//! - [`Database`] and [`DatabaseConfig`]: connection handle and its settings
//! - [`Patch`]: an id plus the action that applies it
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use sqlpatch::{Database, Patch};
//!
//! let db = Database::open_in_memory().unwrap();
//! let patches = [Patch::new(1, |db| {
//!     db.create_table("accounts (id INTEGER PRIMARY KEY, owner TEXT)")?;
//!     Ok(())
//! })];
//!
//! db.apply_patches(&patches).unwrap();
//! // Running the same list again is a no-op
//! db.apply_patches(&patches).unwrap();
//!
//! let id = db.next_unique_key().unwrap();
//! db.execute(
//!     "INSERT INTO accounts (id, owner) VALUES (?1, ?2)",
//!     rusqlite::params![id, "ada"],
//! )
//! .unwrap();
//! ```

pub mod database;
pub mod error;

// Re-export key types at crate root for convenience
pub use database::{Database, DatabaseConfig, Patch};
pub use error::{Error, Result};
