//! Shared news store handle.
//!
//! # Responsibility
//! - Own the single SQLite connection used for news access.
//! - Provide the explicit open/close lifecycle of that connection.
//! - Serialize every news operation behind one lock.
//!
//! # Invariants
//! - The lock is held for the full call, statement plus row iteration.
//! - Calls made while the store is closed return `StoreUnavailable`.
//! - Closing is idempotent; a closed store never reopens itself.

use crate::db::{bootstrap_connection, open_db, open_db_in_memory, DbResult};
use crate::model::news::{NewsDraft, NewsId, NewsItem};
use crate::repo::news_repo::{
    NewsDateRange, NewsPageRequest, NewsRepository, SqliteNewsRepository, StoreError, StoreResult,
};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// News store owned by the application context.
///
/// Cloning is not supported; share it through `Arc<NewsStore>`.
pub struct NewsStore {
    conn: Mutex<Option<Connection>>,
}

impl NewsStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = open_db(path)?;
        Ok(Self::with_ready_connection(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::with_ready_connection(conn))
    }

    /// Takes ownership of an existing connection after bootstrapping it.
    pub fn from_connection(mut conn: Connection) -> DbResult<Self> {
        bootstrap_connection(&mut conn)?;
        Ok(Self::with_ready_connection(conn))
    }

    /// Creates a store without a handle; every operation reports
    /// `StoreUnavailable`.
    pub fn closed() -> Self {
        Self {
            conn: Mutex::new(None),
        }
    }

    /// Returns whether the store currently holds a connection.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Closes the connection. Returns `false` when the store was already closed.
    pub fn close(&self) -> bool {
        let Some(conn) = self.lock().take() else {
            return false;
        };

        match conn.close() {
            Ok(()) => info!("event=db_close module=news status=ok"),
            Err((_, err)) => error!("event=db_close module=news status=error error={}", err),
        }
        true
    }

    fn with_ready_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        // Poisoning is ignored; the connection stays usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_repo<T>(
        &self,
        op: &'static str,
        run: impl FnOnce(&SqliteNewsRepository<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let guard = self.lock();
        let Some(conn) = guard.as_ref() else {
            warn!("event=news_query module=news status=unavailable op={}", op);
            return Err(StoreError::StoreUnavailable);
        };
        run(&SqliteNewsRepository::new(conn))
    }
}

impl NewsRepository for NewsStore {
    fn list_all(&self) -> StoreResult<Vec<NewsItem>> {
        self.with_repo("list_all", |repo| repo.list_all())
    }

    fn list_page(&self, request: NewsPageRequest) -> StoreResult<Vec<NewsItem>> {
        self.with_repo("list_page", |repo| repo.list_page(request))
    }

    fn list_in_range(&self, range: NewsDateRange) -> StoreResult<Vec<NewsItem>> {
        self.with_repo("list_in_range", |repo| repo.list_in_range(range))
    }

    fn list_in_range_page(
        &self,
        range: NewsDateRange,
        request: NewsPageRequest,
    ) -> StoreResult<Vec<NewsItem>> {
        self.with_repo("list_in_range_page", |repo| {
            repo.list_in_range_page(range, request)
        })
    }

    fn count_all(&self) -> StoreResult<u64> {
        self.with_repo("count_all", |repo| repo.count_all())
    }

    fn count_in_range(&self, range: NewsDateRange) -> StoreResult<u64> {
        self.with_repo("count_in_range", |repo| repo.count_in_range(range))
    }

    fn get_by_id(&self, id: NewsId) -> StoreResult<Option<NewsItem>> {
        self.with_repo("get_by_id", |repo| repo.get_by_id(id))
    }

    fn create(&self, draft: &NewsDraft) -> StoreResult<NewsId> {
        self.with_repo("create", |repo| repo.create(draft))
    }

    fn update(&self, id: NewsId, draft: &NewsDraft) -> StoreResult<()> {
        self.with_repo("update", |repo| repo.update(id, draft))
    }

    fn delete(&self, id: NewsId) -> StoreResult<()> {
        self.with_repo("delete", |repo| repo.delete(id))
    }
}

impl Drop for NewsStore {
    fn drop(&mut self) {
        self.close();
    }
}
