//! Bookkeeping table definitions and SQL constants.
//!
//! This module contains the SQL used by the patch engine and the unique key
//! generator. Host tables are created by host patches, not here.

/// Default savepoint name used while a patch is being applied.
pub const DEFAULT_PATCH_SAVEPOINT: &str = "patchupdate";

/// Name of the table recording applied patch ids.
pub const VERSION_TABLE: &str = "version";

/// Definition of the version table, passed to `create_table`.
pub const VERSION_TABLE_DEF: &str = "IF NOT EXISTS version (patchid INTEGER PRIMARY KEY)";

/// Definition of the unique key table, passed to `create_table`.
pub const GKEY_TABLE_DEF: &str = "IF NOT EXISTS gkey (next INTEGER PRIMARY KEY)";

/// Seeds the unique key table with its first key. A table that already holds
/// a row keeps it, so there is never more than one.
pub const SEED_GKEY: &str =
    "INSERT INTO gkey (next) SELECT 1 WHERE NOT EXISTS (SELECT 1 FROM gkey)";

pub const SELECT_PATCH: &str = "SELECT patchid FROM version WHERE patchid = ?1";

pub const SELECT_ALL_PATCHES: &str = "SELECT patchid FROM version ORDER BY patchid";

/// Records an applied patch. `OR FAIL` turns a duplicate id into an error
/// instead of silently ignoring it.
pub const INSERT_PATCH: &str = "INSERT OR FAIL INTO version (patchid) VALUES (?1)";

pub const SELECT_NEXT_KEY: &str = "SELECT next FROM gkey";

pub const INCREMENT_NEXT_KEY: &str = "UPDATE gkey SET next = next + 1 WHERE next = ?1";

pub const SELECT_TABLE_EXISTS: &str =
    "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1";
