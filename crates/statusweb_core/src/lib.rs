//! Core of the game server status site: news storage, view models and
//! ambient process setup.
//! Page rendering and HTTP routing live outside this crate.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::news::{NewsDraft, NewsId, NewsItem, NewsValidationError};
pub use repo::news_repo::{
    NewsDateRange, NewsPageRequest, NewsRepository, SqliteNewsRepository, StoreError, StoreResult,
};
pub use service::news_store::NewsStore;
pub use view::news_page::{
    date_range, format_timestamp, news_archive_page, news_feed_page, parse_date, NewsItemView,
    NewsPageView, ViewError,
};
