use rusqlite::Connection;
use statusweb_core::{
    NewsDateRange, NewsDraft, NewsPageRequest, NewsRepository, NewsStore, StoreError,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn closed_store_reports_unavailable_for_every_operation() {
    let store = NewsStore::closed();
    assert!(!store.is_open());

    let range = NewsDateRange::new(0, 0);
    let page = NewsPageRequest::new(1, 10);
    let draft = NewsDraft::new("title", "body");

    assert!(matches!(store.list_all(), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.list_page(page), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.list_in_range(range), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.list_in_range_page(range, page), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.count_all(), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.count_in_range(range), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.get_by_id(1), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.create(&draft), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.update(1, &draft), Err(StoreError::StoreUnavailable)));
    assert!(matches!(store.delete(1), Err(StoreError::StoreUnavailable)));
}

#[test]
fn close_is_idempotent_and_disables_store() {
    let store = NewsStore::open_in_memory().unwrap();
    assert!(store.is_open());
    store.create(&NewsDraft::new("before close", "body")).unwrap();

    assert!(store.close());
    assert!(!store.close());
    assert!(!store.is_open());

    let err = store.count_all().unwrap_err();
    assert!(matches!(err, StoreError::StoreUnavailable));
}

#[test]
fn from_connection_bootstraps_schema() {
    let conn = Connection::open_in_memory().unwrap();
    let store = NewsStore::from_connection(conn).unwrap();

    let id = store.create(&NewsDraft::new("Patch 1.1", "Fixed bugs")).unwrap();
    let loaded = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.title, "Patch 1.1");
}

#[test]
fn file_store_creates_missing_directory_and_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("web").join("tibia.db");

    let store = NewsStore::open(&path).unwrap();
    let id = store
        .create(&NewsDraft::new("World transfer", "Transfers open on Monday"))
        .unwrap();
    store.close();
    assert!(path.exists());

    let reopened = NewsStore::open(&path).unwrap();
    let loaded = reopened.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.content, "Transfers open on Monday");
}

#[test]
fn concurrent_writers_are_serialized() {
    let store = Arc::new(NewsStore::open_in_memory().unwrap());
    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..25)
                    .map(|index| {
                        store
                            .create(&NewsDraft::new(format!("w{worker} n{index}"), "body"))
                            .unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for worker in workers {
        for id in worker.join().unwrap() {
            assert!(ids.insert(id), "id {id} assigned twice");
        }
    }

    assert_eq!(ids.len(), 200);
    assert_eq!(store.count_all().unwrap(), 200);
    assert_eq!(store.list_all().unwrap().len(), 200);
}
