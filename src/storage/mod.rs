//! Storage Layer - SQLite-backed persistence
//!
//! Two database files under `<root>/databases/`:
//! - reuters.db: articles(url, title, date, summary)
//! - daily.db: one table per ticker, <TICKER>(date, open, high, low, close, volume)

pub mod articles;
pub mod connection;
pub mod prices;
pub mod schema;

pub use articles::ArticleStore;
pub use connection::Database;
pub use prices::PriceStore;
pub use schema::{ConflictPolicy, Ticker};

use crate::Error;

/// Turn a primary key violation into `Error::Duplicate`, pass anything else through
pub(crate) fn conflict_error(err: rusqlite::Error, table: &str, key: &str) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Error::Duplicate {
                table: table.to_string(),
                key: key.to_string(),
            }
        }
        other => Error::Storage(other),
    }
}
