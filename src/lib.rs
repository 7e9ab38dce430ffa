//! # marketdb - local market data persistence
//!
//! Stores two kinds of time-stamped records in embedded SQLite files:
//! - News articles keyed by URL (`databases/reuters.db`)
//! - Daily price bars, one table per ticker keyed by date (`databases/daily.db`)
//!
//! Both stores insert idempotently and read back into typed records
//! ready for analysis.

pub mod article;
pub mod config;
pub mod frame;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use article::Article;
pub use frame::{DailyFrame, PriceBar, PriceBatch, PriceColumn, PriceRow};
pub use storage::{ArticleStore, ConflictPolicy, Database, PriceStore, Ticker};

/// Result type alias for marketdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for marketdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    #[error("Invalid column: {0:?}")]
    InvalidColumn(String),

    #[error("Cannot parse date {0:?}")]
    DateParse(String),

    #[error("Duplicate key in {table}: {key}")]
    Duplicate { table: String, key: String },
}
