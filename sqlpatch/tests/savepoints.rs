//! Integration tests for transactions, savepoints and table DDL against a
//! database file.

mod common;

use common::{count_rows, TestDb};

#[test]
fn test_savepoint_round_trip_restores_state() {
    let fixture = TestDb::new();
    let db = fixture.open();
    db.create_table("events (id INTEGER PRIMARY KEY, kind TEXT)")
        .unwrap();
    db.execute("INSERT INTO events (kind) VALUES ('boot')", [])
        .unwrap();

    db.begin_trans().unwrap();
    db.create_savepoint("probe").unwrap();
    db.execute("INSERT INTO events (kind) VALUES ('probe')", [])
        .unwrap();
    db.execute("UPDATE events SET kind = 'changed'", []).unwrap();
    db.create_table("probe_only (id INTEGER)").unwrap();
    db.rollback_savepoint("probe").unwrap();

    assert!(db.in_transaction());
    assert_eq!(count_rows(&db, "events"), 1);
    let kind: Option<String> = db.query_single("SELECT kind FROM events", []).unwrap();
    assert_eq!(kind.as_deref(), Some("boot"));
    assert!(!db.table_exists("probe_only").unwrap());

    db.execute("INSERT INTO events (kind) VALUES ('after')", [])
        .unwrap();
    db.commit_trans().unwrap();
    drop(db);

    let db = fixture.open();
    assert_eq!(count_rows(&db, "events"), 2);
}

#[test]
fn test_uncommitted_transaction_is_lost_on_close() {
    let fixture = TestDb::new();
    {
        let db = fixture.open();
        db.create_table("drafts (body TEXT)").unwrap();
        db.begin_trans().unwrap();
        db.execute("INSERT INTO drafts VALUES ('unsaved')", [])
            .unwrap();
    }

    let db = fixture.open();
    assert_eq!(count_rows(&db, "drafts"), 0);
}

#[test]
fn test_exec_with_savepoint_commits_outside_transaction() {
    let fixture = TestDb::new();
    {
        let db = fixture.open();
        db.create_table("counters (n INTEGER)").unwrap();
        db.exec_with_savepoint("seed", |db| -> sqlpatch::Result<()> {
            db.execute("INSERT INTO counters VALUES (1)", [])?;
            db.execute("INSERT INTO counters VALUES (2)", [])?;
            Ok(())
        })
        .unwrap();
    }

    let db = fixture.open();
    assert_eq!(count_rows(&db, "counters"), 2);
}

#[test]
fn test_drop_table_is_idempotent_but_drop_index_is_not() {
    let fixture = TestDb::new();
    let db = fixture.open();

    db.drop_table("notatable").unwrap();
    db.drop_table("notatable").unwrap();
    assert!(db.drop_index("notanindex").is_err());
}

#[test]
fn test_create_index_requires_table() {
    let fixture = TestDb::new();
    let db = fixture.open();

    assert!(db.create_index("test_idx ON notatable (id)").is_err());

    db.create_table("testtable (id INTEGER, field1 TEXT, field2 TEXT)")
        .unwrap();
    db.create_index("test_idx ON testtable (id)").unwrap();
}
