//! News repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, paginated and date-range reads over the `news` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every listing is ordered by `created_at DESC, id DESC`.
//! - A row that fails to decode during a listing is logged and skipped; the
//!   remaining rows are still returned.
//! - Date ranges include the whole day after `to` (`created_at <= to + 1 day`).

use crate::db::DbError;
use crate::model::news::{NewsDraft, NewsId, NewsItem, DAY_MS};
use log::{error, warn};
use rusqlite::{params, Connection, Params, Row, Statement};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NEWS_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at
FROM news";

const NEWS_ORDER_SQL: &str = "ORDER BY created_at DESC, id DESC";

const NEWS_RANGE_SQL: &str = "WHERE created_at >= ?1 AND created_at <= ?2";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by every news store operation.
#[derive(Debug)]
pub enum StoreError {
    /// The store handle is not open.
    StoreUnavailable,
    /// The underlying statement failed.
    QueryFailed { op: &'static str, source: DbError },
    /// Update/delete target does not exist.
    NotFound(NewsId),
    /// A single requested row could not be decoded.
    ScanFailed {
        id: Option<NewsId>,
        source: rusqlite::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreUnavailable => write!(f, "news store is not initialized"),
            Self::QueryFailed { op, source } => write!(f, "news query `{op}` failed: {source}"),
            Self::NotFound(id) => write!(f, "news not found: {id}"),
            Self::ScanFailed { id: Some(id), source } => {
                write!(f, "failed to decode news row {id}: {source}")
            }
            Self::ScanFailed { id: None, source } => {
                write!(f, "failed to decode news row: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QueryFailed { source, .. } => Some(source),
            Self::ScanFailed { source, .. } => Some(source),
            Self::StoreUnavailable | Self::NotFound(_) => None,
        }
    }
}

/// 1-based page selector for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsPageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl NewsPageRequest {
    /// Builds a request; a page below 1 is treated as page 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1).saturating_mul(i64::from(self.page_size))
    }
}

/// Creation-time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsDateRange {
    pub from: i64,
    pub to: i64,
}

impl NewsDateRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Inclusive upper bound used in SQL: one day past `to`.
    pub fn upper_bound(&self) -> i64 {
        self.to.saturating_add(DAY_MS)
    }
}

/// Repository interface for news operations.
pub trait NewsRepository {
    fn list_all(&self) -> StoreResult<Vec<NewsItem>>;
    fn list_page(&self, request: NewsPageRequest) -> StoreResult<Vec<NewsItem>>;
    fn list_in_range(&self, range: NewsDateRange) -> StoreResult<Vec<NewsItem>>;
    fn list_in_range_page(
        &self,
        range: NewsDateRange,
        request: NewsPageRequest,
    ) -> StoreResult<Vec<NewsItem>>;
    fn count_all(&self) -> StoreResult<u64>;
    fn count_in_range(&self, range: NewsDateRange) -> StoreResult<u64>;
    fn get_by_id(&self, id: NewsId) -> StoreResult<Option<NewsItem>>;
    fn create(&self, draft: &NewsDraft) -> StoreResult<NewsId>;
    fn update(&self, id: NewsId, draft: &NewsDraft) -> StoreResult<()>;
    fn delete(&self, id: NewsId) -> StoreResult<()>;
}

/// SQLite-backed news repository.
pub struct SqliteNewsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNewsRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn prepare(&self, op: &'static str, sql: &str) -> StoreResult<Statement<'conn>> {
        self.conn.prepare(sql).map_err(|err| query_failed(op, err))
    }
}

impl NewsRepository for SqliteNewsRepository<'_> {
    fn list_all(&self) -> StoreResult<Vec<NewsItem>> {
        let mut stmt = self.prepare("list_all", &format!("{NEWS_SELECT_SQL} {NEWS_ORDER_SQL};"))?;
        collect_news_rows("list_all", &mut stmt, [])
    }

    fn list_page(&self, request: NewsPageRequest) -> StoreResult<Vec<NewsItem>> {
        let mut stmt = self.prepare(
            "list_page",
            &format!("{NEWS_SELECT_SQL} {NEWS_ORDER_SQL} LIMIT ?1 OFFSET ?2;"),
        )?;
        collect_news_rows(
            "list_page",
            &mut stmt,
            params![i64::from(request.page_size), request.offset()],
        )
    }

    fn list_in_range(&self, range: NewsDateRange) -> StoreResult<Vec<NewsItem>> {
        let mut stmt = self.prepare(
            "list_in_range",
            &format!("{NEWS_SELECT_SQL} {NEWS_RANGE_SQL} {NEWS_ORDER_SQL};"),
        )?;
        collect_news_rows(
            "list_in_range",
            &mut stmt,
            params![range.from, range.upper_bound()],
        )
    }

    fn list_in_range_page(
        &self,
        range: NewsDateRange,
        request: NewsPageRequest,
    ) -> StoreResult<Vec<NewsItem>> {
        let mut stmt = self.prepare(
            "list_in_range_page",
            &format!("{NEWS_SELECT_SQL} {NEWS_RANGE_SQL} {NEWS_ORDER_SQL} LIMIT ?3 OFFSET ?4;"),
        )?;
        collect_news_rows(
            "list_in_range_page",
            &mut stmt,
            params![
                range.from,
                range.upper_bound(),
                i64::from(request.page_size),
                request.offset(),
            ],
        )
    }

    fn count_all(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM news;", [], |row| row.get(0))
            .map_err(|err| query_failed("count_all", err))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn count_in_range(&self, range: NewsDateRange) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM news {NEWS_RANGE_SQL};"),
                params![range.from, range.upper_bound()],
                |row| row.get(0),
            )
            .map_err(|err| query_failed("count_in_range", err))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn get_by_id(&self, id: NewsId) -> StoreResult<Option<NewsItem>> {
        let mut stmt = self.prepare("get_by_id", &format!("{NEWS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt
            .query([id])
            .map_err(|err| query_failed("get_by_id", err))?;

        match rows.next() {
            Ok(Some(row)) => parse_news_row(row).map(Some).map_err(|err| {
                error!(
                    "event=news_row_scan module=news status=error op=get_by_id id={} error={}",
                    id, err
                );
                StoreError::ScanFailed {
                    id: Some(id),
                    source: err,
                }
            }),
            Ok(None) => Ok(None),
            Err(err) => Err(query_failed("get_by_id", err)),
        }
    }

    fn create(&self, draft: &NewsDraft) -> StoreResult<NewsId> {
        self.conn
            .execute(
                "INSERT INTO news (title, content) VALUES (?1, ?2);",
                params![draft.title.as_str(), draft.content.as_str()],
            )
            .map_err(|err| query_failed("create", err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: NewsId, draft: &NewsDraft) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE news
                 SET
                    title = ?1,
                    content = ?2
                 WHERE id = ?3;",
                params![draft.title.as_str(), draft.content.as_str(), id],
            )
            .map_err(|err| query_failed("update", err))?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: NewsId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM news WHERE id = ?1;", [id])
            .map_err(|err| query_failed("delete", err))?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }
}

fn collect_news_rows<P: Params>(
    op: &'static str,
    stmt: &mut Statement<'_>,
    params: P,
) -> StoreResult<Vec<NewsItem>> {
    let mut rows = stmt.query(params).map_err(|err| query_failed(op, err))?;
    let mut items = Vec::new();

    loop {
        match rows.next() {
            Ok(Some(row)) => match parse_news_row(row) {
                Ok(item) => items.push(item),
                Err(err) => {
                    let id = row.get::<_, i64>("id").ok();
                    warn!(
                        "event=news_row_skipped module=news status=error op={} id={} error={}",
                        op,
                        id.map_or_else(|| "unknown".to_string(), |id| id.to_string()),
                        err
                    );
                }
            },
            Ok(None) => break,
            Err(err) => return Err(query_failed(op, err)),
        }
    }

    Ok(items)
}

fn parse_news_row(row: &Row<'_>) -> rusqlite::Result<NewsItem> {
    Ok(NewsItem {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

fn query_failed(op: &'static str, err: rusqlite::Error) -> StoreError {
    error!(
        "event=news_query module=news status=error op={} error={}",
        op, err
    );
    StoreError::QueryFailed {
        op,
        source: DbError::Sqlite(err),
    }
}
