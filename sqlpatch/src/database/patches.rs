//! Run-once database patches.
//!
//! A patch is an id plus an action. Applied ids are recorded in the
//! `version` table inside the same savepoint as the patch's own writes, so a
//! patch is either fully applied and recorded, or not at all. Internal
//! patches (ids `<= 0`) create the bookkeeping tables and always run before
//! host patches.

use std::fmt;

use crate::error::{Error, Result};

use super::config::DatabaseConfig;
use super::connection::Database;
use super::schema::{
    GKEY_TABLE_DEF, INSERT_PATCH, SEED_GKEY, SELECT_ALL_PATCHES, SELECT_PATCH, VERSION_TABLE,
    VERSION_TABLE_DEF,
};
use super::transaction::validate_savepoint_name;

/// A one-time database mutation identified by a unique id.
///
/// Ids only need to be unique; they are not sorted, so list patches in the
/// order they must run. Ids `<= 0` are reserved for internal patches.
///
/// The action receives the database handle and may use any of its
/// statement or savepoint helpers, except the savepoint name reserved by
/// [`DatabaseConfig::patch_savepoint`].
///
/// # Examples
///
/// ```
/// use sqlpatch::{Database, Patch};
///
/// let patches = [
///     Patch::new(1, |db| {
///         db.create_table("users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")?;
///         Ok(())
///     }),
///     Patch::new(2, |db| {
///         db.create_index("users_name_idx ON users (name)")?;
///         Ok(())
///     }),
/// ];
///
/// let db = Database::open_in_memory().unwrap();
/// db.apply_patches(&patches).unwrap();
/// assert_eq!(db.applied_patches().unwrap(), vec![-1, 0, 1, 2]);
/// ```
pub struct Patch<'a> {
    id: i64,
    action: Box<dyn Fn(&Database) -> anyhow::Result<()> + 'a>,
}

impl<'a> Patch<'a> {
    /// Creates a patch from its id and action.
    pub fn new<F>(id: i64, action: F) -> Self
    where
        F: Fn(&Database) -> anyhow::Result<()> + 'a,
    {
        Self {
            id,
            action: Box::new(action),
        }
    }

    /// Returns the patch id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }
}

impl fmt::Debug for Patch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch").field("id", &self.id).finish_non_exhaustive()
    }
}

/// Patches that create the bookkeeping tables, in application order.
fn internal_patches() -> [Patch<'static>; 2] {
    [
        Patch::new(0, |db| {
            db.create_table(VERSION_TABLE_DEF)?;
            Ok(())
        }),
        Patch::new(-1, |db| {
            db.create_table(GKEY_TABLE_DEF)?;
            db.execute(SEED_GKEY, [])?;
            Ok(())
        }),
    ]
}

impl Database {
    /// Opens a database and applies the internal patches followed by
    /// `patches`.
    ///
    /// A patch failure does not invalidate the connection, so the handle is
    /// returned together with the patch result.
    ///
    /// # Errors
    ///
    /// The outer error reports a failure to open the database. The inner
    /// result reports a failure to apply the patches.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sqlpatch::{Database, DatabaseConfig, Patch};
    ///
    /// let patches = [Patch::new(1, |db| {
    ///     db.create_table("notes (id INTEGER PRIMARY KEY, body TEXT)")?;
    ///     Ok(())
    /// })];
    ///
    /// let config = DatabaseConfig::new("/tmp/app.db");
    /// let (db, patched) = Database::open_and_patch(config, &patches).unwrap();
    /// if let Err(e) = patched {
    ///     eprintln!("database left at {:?}: {e}", db.applied_patches());
    /// }
    /// ```
    pub fn open_and_patch(
        config: DatabaseConfig,
        patches: &[Patch<'_>],
    ) -> Result<(Self, Result<()>)> {
        let db = Self::open(config)?;
        let patched = db.apply_patches(patches);
        Ok((db, patched))
    }

    /// Applies every patch whose id is not yet recorded, internal patches
    /// first.
    ///
    /// Each patch runs in its own savepoint. Outside a transaction every
    /// applied patch is committed as it completes; inside a caller's
    /// transaction the patches fold into it and the caller decides whether
    /// to commit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSavepointName`] if the configured patch
    /// savepoint name is unusable. Otherwise stops at the first failing patch
    /// and returns [`Error::Patch`] naming it; that patch's writes have been
    /// rolled back and later patches have not run.
    pub fn apply_patches(&self, patches: &[Patch<'_>]) -> Result<()> {
        validate_savepoint_name(&self.config.patch_savepoint)?;
        self.apply_in_order(&internal_patches())?;
        self.apply_in_order(patches)
    }

    /// Returns whether the patch with this id has been applied.
    ///
    /// A database without a `version` table has no patches applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the `version` table exists but cannot
    /// be queried. Such a failure is never read as "not applied".
    pub fn is_patched(&self, id: i64) -> Result<bool> {
        if !self.table_exists(VERSION_TABLE)? {
            return Ok(false);
        }
        let found: Option<i64> = self.query_single(SELECT_PATCH, [id])?;
        Ok(found.is_some())
    }

    /// Returns the ids of all applied patches in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Statement`] if the `version` table cannot be read.
    pub fn applied_patches(&self) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        if !self.table_exists(VERSION_TABLE)? {
            return Ok(ids);
        }
        self.query_each(SELECT_ALL_PATCHES, [], |row| {
            ids.push(row.get(0)?);
            Ok(())
        })?;
        Ok(ids)
    }

    fn apply_in_order(&self, patches: &[Patch<'_>]) -> Result<()> {
        // TODO: detect a database that has patch ids this list doesn't know
        // about (database newer than the code applying it).
        for patch in patches {
            let applied = self.is_patched(patch.id).map_err(|e| Error::Patch {
                id: patch.id,
                source: e.into(),
            })?;
            if applied {
                log::debug!("patch {} already applied", patch.id);
                continue;
            }
            self.apply_patch(patch)?;
            log::info!("applied patch {}", patch.id);
        }
        Ok(())
    }

    fn apply_patch(&self, patch: &Patch<'_>) -> Result<()> {
        self.exec_with_savepoint(&self.config.patch_savepoint, |db| -> anyhow::Result<()> {
            (patch.action)(db)?;
            db.execute(INSERT_PATCH, [patch.id])?;
            Ok(())
        })
        .map_err(|source| {
            log::error!("could not apply patch {}: {source:#}", patch.id);
            Error::Patch {
                id: patch.id,
                source,
            }
        })
    }
}
