use statusweb_core::db::open_db_in_memory;
use statusweb_core::model::news::NEWS_TITLE_MAX_CHARS;
use statusweb_core::{NewsDraft, NewsRepository, SqliteNewsRepository, StoreError};
use std::time::{SystemTime, UNIX_EPOCH};

fn now_ms() -> i64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    i64::try_from(millis).unwrap()
}

#[test]
fn create_get_delete_example_flow() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let id = repo
        .create(&NewsDraft::new("Patch 1.1", "Fixed bugs"))
        .unwrap();
    assert_eq!(id, 1);

    let loaded = repo.get_by_id(1).unwrap().unwrap();
    assert_eq!(loaded.title, "Patch 1.1");
    assert_eq!(loaded.content, "Fixed bugs");

    repo.delete(1).unwrap();
    assert!(repo.get_by_id(1).unwrap().is_none());
}

#[test]
fn created_at_is_assigned_by_store_at_insert_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let before = now_ms();
    let id = repo
        .create(&NewsDraft::new("Server save", "Daily save at 10:00"))
        .unwrap();

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert!(
        loaded.created_at >= before,
        "created_at {} should not precede insertion time {}",
        loaded.created_at,
        before
    );
}

#[test]
fn ids_are_unique_and_increasing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let first = repo.create(&NewsDraft::new("one", "body")).unwrap();
    let second = repo.create(&NewsDraft::new("two", "body")).unwrap();
    repo.delete(second).unwrap();
    let third = repo.create(&NewsDraft::new("three", "body")).unwrap();

    assert!(first < second);
    assert!(second < third, "deleted ids must not be reused");
}

#[test]
fn get_missing_id_is_absent_not_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    assert!(repo.get_by_id(42).unwrap().is_none());
}

#[test]
fn update_replaces_title_and_content_but_keeps_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let id = repo.create(&NewsDraft::new("draft", "first text")).unwrap();
    conn.execute("UPDATE news SET created_at = 1000 WHERE id = ?1;", [id])
        .unwrap();

    repo.update(id, &NewsDraft::new("Final", "second text")).unwrap();

    let loaded = repo.get_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "Final");
    assert_eq!(loaded.content, "second text");
    assert_eq!(loaded.created_at, 1000);
}

#[test]
fn update_not_found_returns_not_found_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let id = repo.create(&NewsDraft::new("kept", "body")).unwrap();
    let before = repo.list_all().unwrap();

    let err = repo
        .update(id + 100, &NewsDraft::new("ghost", "body"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id + 100));

    assert_eq!(repo.list_all().unwrap(), before);
}

#[test]
fn delete_twice_returns_not_found_second_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let id = repo.create(&NewsDraft::new("short lived", "body")).unwrap();
    repo.delete(id).unwrap();

    let err = repo.delete(id).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(missing) if missing == id));
}

#[test]
fn store_accepts_any_title_and_content() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);

    let empty_id = repo.create(&NewsDraft::new("", "")).unwrap();
    let long_title = "x".repeat(NEWS_TITLE_MAX_CHARS + 1);
    let long_id = repo.create(&NewsDraft::new(long_title.as_str(), "body")).unwrap();

    let empty = repo.get_by_id(empty_id).unwrap().unwrap();
    assert_eq!(empty.title, "");
    assert_eq!(empty.content, "");
    assert_eq!(repo.get_by_id(long_id).unwrap().unwrap().title, long_title);

    repo.update(long_id, &NewsDraft::new("  ", "")).unwrap();
    let blanked = repo.get_by_id(long_id).unwrap().unwrap();
    assert_eq!(blanked.title, "  ");
    assert_eq!(blanked.content, "");
}

#[test]
fn query_failure_is_reported_as_query_failed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNewsRepository::new(&conn);
    conn.execute_batch("DROP TABLE news;").unwrap();

    let err = repo.list_all().unwrap_err();
    assert!(matches!(err, StoreError::QueryFailed { op: "list_all", .. }));

    let err = repo.count_all().unwrap_err();
    assert!(matches!(err, StoreError::QueryFailed { op: "count_all", .. }));
}
