//! Property-based tests for patch application and the key generator.

use std::cell::RefCell;
use std::collections::BTreeSet;

use proptest::prelude::*;

use super::{Database, Patch};

fn patches_recording<'a>(ids: &[i64], calls: &'a RefCell<Vec<i64>>) -> Vec<Patch<'a>> {
    ids.iter()
        .map(|&id| {
            Patch::new(id, move |_| {
                calls.borrow_mut().push(id);
                Ok(())
            })
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    // Keys handed out are exactly 1..=n, in order
    #[test]
    fn keys_are_consecutive_from_one(n in 1usize..40) {
        let db = Database::open_in_memory().unwrap();
        db.apply_patches(&[]).unwrap();

        let keys: Vec<i64> = (0..n).map(|_| db.next_unique_key().unwrap()).collect();
        let expected: Vec<i64> = (1..=n as i64).collect();
        prop_assert_eq!(keys, expected);
    }

    // Across two runs, every id executes exactly once, first run in list order
    #[test]
    fn each_patch_runs_at_most_once(
        first in proptest::collection::btree_set(1i64..200, 0..15),
        second in proptest::collection::btree_set(1i64..200, 0..15),
    ) {
        let db = Database::open_in_memory().unwrap();
        let calls = RefCell::new(Vec::new());

        let first_ids: Vec<i64> = first.iter().copied().collect();
        db.apply_patches(&patches_recording(&first_ids, &calls)).unwrap();
        prop_assert_eq!(calls.borrow().clone(), first_ids);

        calls.borrow_mut().clear();
        let second_ids: Vec<i64> = second.iter().copied().collect();
        db.apply_patches(&patches_recording(&second_ids, &calls)).unwrap();

        let fresh: Vec<i64> = second.difference(&first).copied().collect();
        prop_assert_eq!(calls.borrow().clone(), fresh);

        let applied: BTreeSet<i64> = db
            .applied_patches()
            .unwrap()
            .into_iter()
            .filter(|id| *id > 0)
            .collect();
        let union: BTreeSet<i64> = first.union(&second).copied().collect();
        prop_assert_eq!(applied, union);
    }

    // A failing patch stops the run and leaves later patches unapplied
    #[test]
    fn failure_stops_remaining_patches(count in 1i64..10, failing in 1i64..10) {
        let failing = failing.min(count);
        let db = Database::open_in_memory().unwrap();
        let patches: Vec<Patch<'_>> = (1..=count)
            .map(|id| {
                Patch::new(id, move |db| {
                    db.create_table(&format!("t{id} (x INTEGER)"))?;
                    if id == failing {
                        anyhow::bail!("patch {id} refuses");
                    }
                    Ok(())
                })
            })
            .collect();

        let err = db.apply_patches(&patches).unwrap_err();
        prop_assert_eq!(err.patch_id(), Some(failing));

        for id in 1..=count {
            prop_assert_eq!(db.table_exists(&format!("t{id}")).unwrap(), id < failing);
            prop_assert_eq!(db.is_patched(id).unwrap(), id < failing);
        }
    }
}
