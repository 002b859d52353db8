use fieldguard_datasets::{
    Column, Dataset, DatasetError, DatasetStore, MemoryStore, SqliteStore, read_csv,
};
use pretty_assertions::assert_eq;

fn sample() -> Dataset {
    Dataset::new(vec![
        Column::from_values("name", ["Ana", "Bo", "Cy"]),
        Column::new(
            "salary",
            vec![Some("1000".into()), None, Some("3000".into())],
        ),
        Column::from_values("email", ["a@x.com", "b@y.com", "c@z.com"]),
    ])
    .unwrap()
}

fn exercise(store: &mut dyn DatasetStore) {
    assert!(matches!(store.load_current(), Err(DatasetError::NoData)));

    store.replace(&sample()).unwrap();
    assert_eq!(store.load_current().unwrap(), sample());

    let replacement = Dataset::new(vec![Column::from_values("id", ["1"])]).unwrap();
    store.replace(&replacement).unwrap();
    assert_eq!(store.load_current().unwrap(), replacement);

    store.clear().unwrap();
    assert!(matches!(store.load_current(), Err(DatasetError::NoData)));
}

// ── MemoryStore ──────────────────────────────────────────────────

#[test]
fn memory_store_contract() {
    exercise(&mut MemoryStore::new());
}

#[test]
fn memory_store_columnless_dataset_is_no_data() {
    let mut store = MemoryStore::new();
    store.replace(&Dataset::default()).unwrap();
    assert!(matches!(store.load_current(), Err(DatasetError::NoData)));
}

// ── SqliteStore ──────────────────────────────────────────────────

#[test]
fn sqlite_store_contract() {
    exercise(&mut SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_store_columnless_dataset_is_no_data() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.replace(&sample()).unwrap();
    store.replace(&Dataset::default()).unwrap();
    assert!(matches!(store.load_current(), Err(DatasetError::NoData)));
}

#[test]
fn sqlite_store_keeps_header_only_dataset() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let header_only = Dataset::new(vec![Column::new("email", vec![])]).unwrap();
    store.replace(&header_only).unwrap();

    let loaded = store.load_current().unwrap();
    assert_eq!(loaded.column_names(), vec!["email"]);
    assert_eq!(loaded.row_count(), 0);
}

#[test]
fn sqlite_store_quotes_awkward_names() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let ds = Dataset::new(vec![
        Column::from_values("select", ["1"]),
        Column::from_values("odd\"name", ["2"]),
    ])
    .unwrap();
    store.replace(&ds).unwrap();
    assert_eq!(store.load_current().unwrap(), ds);
}

#[test]
fn sqlite_store_keeps_row_order_with_rowid_column() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let ds = read_csv("rowid,name\nb,first\na,second\n".as_bytes()).unwrap();
    store.replace(&ds).unwrap();

    let loaded = store.load_current().unwrap();
    assert_eq!(loaded, ds);
    assert_eq!(loaded.column("name").unwrap().get(0), Some("first"));
}

#[test]
fn sqlite_store_keeps_row_order_when_every_alias_is_a_column() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let ds = Dataset::new(vec![
        Column::from_values("ROWID", ["3", "2", "1"]),
        Column::from_values("_rowid_", ["c", "b", "a"]),
        Column::from_values("oid", ["z", "y", "x"]),
        Column::from_values("_fieldguard_row", ["9", "8", "7"]),
    ])
    .unwrap();
    store.replace(&ds).unwrap();
    assert_eq!(store.load_current().unwrap(), ds);
}

#[test]
fn sqlite_store_reads_table_without_ordinal_in_insert_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE \"data\" (\"rowid\" TEXT, \"name\" TEXT);
             INSERT INTO \"data\" VALUES ('b', 'first');
             INSERT INTO \"data\" VALUES ('a', 'second');",
        )
        .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let loaded = store.load_current().unwrap();
    assert_eq!(loaded.column_names(), vec!["rowid", "name"]);
    assert_eq!(loaded.column("name").unwrap().get(0), Some("first"));
    assert_eq!(loaded.column("name").unwrap().get(1), Some("second"));
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.replace(&sample()).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.load_current().unwrap(), sample());
}
