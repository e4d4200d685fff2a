//! News feed and news archive page models.
//!
//! # Invariants
//! - `page` is always within `1..=max(total_pages, 1)`.
//! - `page_size` is always within `1..=NEWS_PAGE_SIZE_MAX`.
//! - Timestamps are rendered in UTC.

use crate::model::news::{NewsItem, DAY_MS};
use crate::repo::news_repo::{NewsDateRange, NewsPageRequest, NewsRepository, StoreError};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NEWS_PAGE_SIZE_DEFAULT: u32 = 10;
pub const NEWS_PAGE_SIZE_MAX: u32 = 50;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug)]
pub enum ViewError {
    InvalidDate(String),
    /// `from` is later than `to`.
    InvalidRange { from: NaiveDate, to: NaiveDate },
    Store(StoreError),
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidRange { from, to } => {
                write!(f, "date range starts after it ends: {from} > {to}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ViewError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One rendered news entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsItemView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at_ms: i64,
    pub created_at_display: String,
}

impl From<NewsItem> for NewsItemView {
    fn from(item: NewsItem) -> Self {
        Self {
            id: item.id,
            created_at_display: format_timestamp(item.created_at),
            created_at_ms: item.created_at,
            title: item.title,
            content: item.content,
        }
    }
}

/// Archive filter echoed back to the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRangeView {
    pub from: String,
    pub to: String,
}

/// One page of the news feed or archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsPageView {
    pub items: Vec<NewsItemView>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub range: Option<DateRangeView>,
}

/// Builds the main news feed page.
pub fn news_feed_page<R: NewsRepository + ?Sized>(
    repo: &R,
    page: u32,
    page_size: u32,
) -> ViewResult<NewsPageView> {
    let page_size = clamp_page_size(page_size);
    let total_items = repo.count_all()?;
    let request = NewsPageRequest::new(clamp_page(page, total_items, page_size), page_size);
    let items = repo.list_page(request)?;

    Ok(build_page(items, request, total_items, None))
}

/// Builds one page of the archive for calendar dates `from..=to` (UTC).
pub fn news_archive_page<R: NewsRepository + ?Sized>(
    repo: &R,
    from: NaiveDate,
    to: NaiveDate,
    page: u32,
    page_size: u32,
) -> ViewResult<NewsPageView> {
    if from > to {
        return Err(ViewError::InvalidRange { from, to });
    }

    let range = date_range(from, to);
    let page_size = clamp_page_size(page_size);
    let total_items = repo.count_in_range(range)?;
    let request = NewsPageRequest::new(clamp_page(page, total_items, page_size), page_size);
    let items = repo.list_in_range_page(range, request)?;

    let range_view = DateRangeView {
        from: from.format(DATE_INPUT_FORMAT).to_string(),
        to: to.format(DATE_INPUT_FORMAT).to_string(),
    };
    Ok(build_page(items, request, total_items, Some(range_view)))
}

/// Parses a `YYYY-MM-DD` form/query value.
pub fn parse_date(text: &str) -> ViewResult<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT)
        .map_err(|_| ViewError::InvalidDate(trimmed.to_string()))
}

/// Store range covering calendar days `from..=to` (UTC).
pub fn date_range(from: NaiveDate, to: NaiveDate) -> NewsDateRange {
    NewsDateRange::new(date_start_ms(from), date_start_ms(to))
}

/// Epoch milliseconds of midnight UTC at the start of `date`.
pub fn date_start_ms(date: NaiveDate) -> i64 {
    // `NaiveDate::default()` is 1970-01-01.
    date.signed_duration_since(NaiveDate::default()).num_days() * DAY_MS
}

/// Formats epoch milliseconds for display; out-of-range values render as `-`.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|at| at.format(TIMESTAMP_DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, NEWS_PAGE_SIZE_MAX)
}

fn clamp_page(page: u32, total_items: u64, page_size: u32) -> u32 {
    page.clamp(1, total_pages(total_items, page_size).max(1))
}

fn build_page(
    items: Vec<NewsItem>,
    request: NewsPageRequest,
    total_items: u64,
    range: Option<DateRangeView>,
) -> NewsPageView {
    let total_pages = total_pages(total_items, request.page_size);
    NewsPageView {
        items: items.into_iter().map(NewsItemView::from).collect(),
        page: request.page,
        page_size: request.page_size,
        total_items,
        total_pages,
        has_previous: request.page > 1,
        has_next: request.page < total_pages,
        range,
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, date_start_ms, format_timestamp, parse_date, total_pages, ViewError};
    use crate::model::news::DAY_MS;
    use chrono::NaiveDate;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn clamp_page_keeps_page_inside_known_pages() {
        assert_eq!(clamp_page(0, 25, 10), 1);
        assert_eq!(clamp_page(2, 25, 10), 2);
        assert_eq!(clamp_page(9, 25, 10), 3);
        assert_eq!(clamp_page(4, 0, 10), 1);
    }

    #[test]
    fn parse_date_accepts_iso_dates_and_rejects_others() {
        let date = parse_date(" 2024-03-05 ").expect("iso date should parse");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date"));

        let err = parse_date("05/03/2024").expect_err("non-iso input must fail");
        assert!(matches!(err, ViewError::InvalidDate(value) if value == "05/03/2024"));
    }

    #[test]
    fn date_start_ms_is_midnight_utc() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date");
        assert_eq!(date_start_ms(epoch), 0);

        let next = NaiveDate::from_ymd_opt(1970, 1, 3).expect("valid date");
        assert_eq!(date_start_ms(next), 2 * DAY_MS);
    }

    #[test]
    fn format_timestamp_renders_utc_minutes() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00");
        assert_eq!(format_timestamp(DAY_MS + 90 * 60 * 1000), "1970-01-02 01:30");
        assert_eq!(format_timestamp(i64::MAX), "-");
    }
}
