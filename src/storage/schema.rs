//! Database schema definitions

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::{Error, Result};

/// SQL to create the articles table
pub const CREATE_ARTICLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    url TEXT PRIMARY KEY,
    title TEXT,
    date TEXT,
    summary TEXT
)
"#;

/// SQL to create the price table for one ticker
pub fn create_ticker_table(ticker: &Ticker) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {} (
    date TEXT PRIMARY KEY,
    open REAL,
    high REAL,
    low REAL,
    close REAL,
    volume REAL
)
"#,
        ticker.quoted()
    )
}

/// What to do when an inserted row collides with an existing primary key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Keep the existing row, drop the new one
    #[default]
    Ignore,
    /// Replace the existing row
    Overwrite,
    /// Abort the whole batch
    Error,
}

impl ConflictPolicy {
    /// `INSERT` verb for this policy
    pub fn insert_verb(&self) -> &'static str {
        match self {
            ConflictPolicy::Ignore => "INSERT OR IGNORE",
            ConflictPolicy::Overwrite => "INSERT OR REPLACE",
            ConflictPolicy::Error => "INSERT",
        }
    }
}

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static ticker pattern"))
}

/// A ticker symbol that is safe to use as a table name.
///
/// Only ASCII letters, digits and underscores are accepted, and names in
/// SQLite's reserved `sqlite_` namespace are refused. The symbol keeps the
/// case it was given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(symbol: &str) -> Result<Self> {
        if !ticker_pattern().is_match(symbol) || symbol.to_ascii_lowercase().starts_with("sqlite_") {
            return Err(Error::InvalidTicker(symbol.to_string()));
        }
        Ok(Self(symbol.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier form for statement text
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = Error;

    fn try_from(symbol: &str) -> Result<Self> {
        Ticker::parse(symbol)
    }
}
