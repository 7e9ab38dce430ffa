//! Daily price store
//!
//! Each ticker gets its own table, created lazily on the first insert for
//! that ticker. Reading a ticker that was never inserted is an error, not an
//! empty frame.

use std::path::Path;

use rusqlite::params;

use super::connection::Database;
use super::schema::{self, ConflictPolicy, Ticker};
use super::conflict_error;
use crate::config::PRICES_DB;
use crate::frame::{DailyFrame, PriceBatch, PriceColumn, parse_date};
use crate::{Error, Result};

/// Daily bars, one table per ticker keyed by date
pub struct PriceStore {
    db: Database,
}

impl PriceStore {
    /// Open `<root>/databases/daily.db`. No tables are created here.
    pub fn open(root: &Path) -> Result<Self> {
        Ok(Self { db: Database::open(root, PRICES_DB)? })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { db: Database::open_in_memory()? })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create the table for `ticker` if it is missing
    pub fn ensure_table(&self, ticker: &str) -> Result<()> {
        self.ensure(&Ticker::parse(ticker)?)
    }

    fn ensure(&self, ticker: &Ticker) -> Result<()> {
        tracing::debug!("Ensuring table for ticker {}", ticker);
        self.db.connection().execute(&schema::create_ticker_table(ticker), [])?;
        Ok(())
    }

    /// Insert a batch, silently skipping dates already stored for `ticker`.
    ///
    /// Returns the number of rows written.
    pub fn insert(&mut self, ticker: &str, batch: &PriceBatch) -> Result<usize> {
        self.insert_with(ticker, batch, ConflictPolicy::Ignore)
    }

    /// Insert a batch in one transaction under the given conflict policy
    pub fn insert_with(
        &mut self,
        ticker: &str,
        batch: &PriceBatch,
        policy: ConflictPolicy,
    ) -> Result<usize> {
        let ticker = Ticker::parse(ticker)?;
        tracing::info!("Inserting {} rows for ticker {} ({:?})", batch.len(), ticker, policy);

        // Every key must read back through `daily`
        for row in batch.rows() {
            parse_date(&row.date)?;
        }

        self.ensure(&ticker)?;

        let sql = format!(
            "{} INTO {} (date, open, high, low, close, volume) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            policy.insert_verb(),
            ticker.quoted()
        );

        let tx = self.db.connection_mut().transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in batch.rows() {
                let bar = &row.bar;
                written += stmt
                    .execute(params![row.date, bar.open, bar.high, bar.low, bar.close, bar.volume])
                    .map_err(|e| conflict_error(e, ticker.as_str(), &row.date))?;
            }
        }
        tx.commit()?;

        tracing::debug!("{} of {} rows written for {}", written, batch.len(), ticker);
        Ok(written)
    }

    /// Close prices for `ticker`, indexed by date
    pub fn daily_close(&self, ticker: &str) -> Result<DailyFrame> {
        self.daily(ticker, &[PriceColumn::Close])
    }

    /// Selected columns for `ticker`, indexed by date, in the order requested
    pub fn daily(&self, ticker: &str, columns: &[PriceColumn]) -> Result<DailyFrame> {
        let ticker = Ticker::parse(ticker)?;

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(Error::InvalidColumn(column.label().to_string()));
            }
        }

        let fields: Vec<&str> = std::iter::once("date")
            .chain(columns.iter().map(PriceColumn::sql_name))
            .collect();
        let fields = fields.join(", ");

        tracing::info!("Retrieving columns ({}) for ticker {}", fields, ticker);

        let mut stmt = self
            .db
            .connection()
            .prepare(&format!("SELECT {} FROM {}", fields, ticker.quoted()))?;

        let raw = stmt
            .query_map([], |row| {
                let date: String = row.get(0)?;
                let values = (1..=columns.len())
                    .map(|i| row.get::<_, Option<f64>>(i).map(|v| v.unwrap_or(f64::NAN)))
                    .collect::<rusqlite::Result<Vec<f64>>>()?;
                Ok((date, values))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut frame = DailyFrame::new(columns.to_vec());
        for (date, values) in raw {
            frame.push_row(parse_date(&date)?, &values);
        }

        Ok(frame)
    }

    /// Tickers that have a table in this file
    pub fn tickers(&self) -> Result<Vec<String>> {
        let mut stmt = self.db.connection().prepare(
            r"SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite\_%' ESCAPE '\' ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(names)
    }

    /// Count rows stored for `ticker`
    pub fn count(&self, ticker: &str) -> Result<usize> {
        let ticker = Ticker::parse(ticker)?;
        let count: i64 = self.db.connection().query_row(
            &format!("SELECT COUNT(*) FROM {}", ticker.quoted()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PriceBar;
    use chrono::NaiveDate;

    fn bar(close: f64) -> PriceBar {
        PriceBar::new(close - 1.0, close + 1.0, close - 2.0, close, 1_000.0 * close)
    }

    fn sample_batch() -> PriceBatch {
        PriceBatch::new()
            .with("2024-01-02", bar(185.0))
            .with("2024-01-03", bar(184.0))
            .with("2024-01-04", bar(181.5))
    }

    fn day(d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_insert_and_daily_close() {
        let mut store = PriceStore::open_in_memory().unwrap();
        assert_eq!(store.insert("AAPL", &sample_batch()).unwrap(), 3);

        let frame = store.daily_close("AAPL").unwrap();
        assert_eq!(frame.columns(), &[PriceColumn::Close]);
        assert_eq!(frame.index(), &[day(2), day(3), day(4)]);
        assert_eq!(frame.column(PriceColumn::Close).unwrap(), &[185.0, 184.0, 181.5]);
    }

    #[test]
    fn test_column_selection_keeps_request_order() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let frame = store.daily("AAPL", &[PriceColumn::Volume, PriceColumn::Open]).unwrap();
        assert_eq!(frame.columns(), &[PriceColumn::Volume, PriceColumn::Open]);
        assert_eq!(frame.get(day(3), PriceColumn::Open), Some(183.0));
        assert_eq!(frame.get(day(3), PriceColumn::Volume), Some(184_000.0));
    }

    #[test]
    fn test_duplicate_date_ignored() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let again = PriceBatch::new().with("2024-01-02", bar(999.0));
        assert_eq!(store.insert("AAPL", &again).unwrap(), 0);
        assert_eq!(store.count("AAPL").unwrap(), 3);
        assert_eq!(store.daily_close("AAPL").unwrap().get(day(2), PriceColumn::Close), Some(185.0));
    }

    #[test]
    fn test_overwrite_policy_replaces_bar() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let again = PriceBatch::new().with("2024-01-02", bar(999.0));
        store.insert_with("AAPL", &again, ConflictPolicy::Overwrite).unwrap();
        assert_eq!(store.count("AAPL").unwrap(), 3);
        assert_eq!(store.daily_close("AAPL").unwrap().get(day(2), PriceColumn::Close), Some(999.0));
    }

    #[test]
    fn test_error_policy_reports_duplicate_and_rolls_back() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let batch = PriceBatch::new()
            .with("2024-01-05", bar(180.0))
            .with("2024-01-02", bar(999.0));
        let err = store.insert_with("AAPL", &batch, ConflictPolicy::Error).unwrap_err();

        assert!(matches!(err, Error::Duplicate { ref table, ref key } if table == "AAPL" && key == "2024-01-02"));
        assert_eq!(store.count("AAPL").unwrap(), 3);
    }

    #[test]
    fn test_tickers_are_separate_tables() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();
        store.insert("MSFT", &PriceBatch::new().with("2024-01-02", bar(370.0))).unwrap();

        assert_eq!(store.tickers().unwrap(), vec!["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(store.count("MSFT").unwrap(), 1);
        assert_eq!(store.count("AAPL").unwrap(), 3);
    }

    #[test]
    fn test_daily_on_unknown_ticker_is_error() {
        let store = PriceStore::open_in_memory().unwrap();
        let err = store.daily_close("NVDA").unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_empty_batch_creates_table_only() {
        let mut store = PriceStore::open_in_memory().unwrap();
        assert_eq!(store.insert("TSLA", &PriceBatch::new()).unwrap(), 0);

        let frame = store.daily_close("TSLA").unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_invalid_ticker_rejected_before_sql() {
        let mut store = PriceStore::open_in_memory().unwrap();
        let err = store.insert("AAPL; DROP TABLE x", &sample_batch()).unwrap_err();
        assert!(matches!(err, Error::InvalidTicker(_)));
        assert!(store.tickers().unwrap().is_empty());
    }

    #[test]
    fn test_repeated_column_rejected() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let err = store.daily("AAPL", &[PriceColumn::Close, PriceColumn::Close]).unwrap_err();
        assert!(matches!(err, Error::InvalidColumn(_)));
    }

    #[test]
    fn test_timestamp_index_round_trip() {
        let mut store = PriceStore::open_in_memory().unwrap();
        let batch: PriceBatch = vec![(day(2), bar(10.0)), (day(3), bar(11.0))].into_iter().collect();
        store.insert("SPY", &batch).unwrap();

        let frame = store.daily_close("SPY").unwrap();
        assert_eq!(frame.index(), &[day(2), day(3)]);
    }

    #[test]
    fn test_utc_datetime_index_round_trip() {
        use chrono::{TimeZone, Utc};

        let mut store = PriceStore::open_in_memory().unwrap();
        let batch = PriceBatch::new()
            .with(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(), bar(185.0))
            .with(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(), bar(184.0));
        assert_eq!(batch.rows()[0].date, "2024-01-02 00:00:00 UTC");
        store.insert("AAPL", &batch).unwrap();

        let frame = store.daily_close("AAPL").unwrap();
        assert_eq!(frame.index(), &[day(2), day(3)]);
        assert_eq!(frame.column(PriceColumn::Close).unwrap(), &[185.0, 184.0]);
    }

    #[test]
    fn test_unreadable_date_key_rejected_before_write() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let batch = PriceBatch::new()
            .with("2024-01-05", bar(180.0))
            .with("Jan 8th", bar(181.0));
        let err = store.insert("AAPL", &batch).unwrap_err();

        assert!(matches!(err, Error::DateParse(ref key) if key == "Jan 8th"));
        assert_eq!(store.count("AAPL").unwrap(), 3);
        assert_eq!(store.daily_close("AAPL").unwrap().len(), 3);
    }

    #[test]
    fn test_unreadable_date_key_does_not_create_table() {
        let mut store = PriceStore::open_in_memory().unwrap();
        let batch = PriceBatch::new().with("not a date", bar(1.0));

        assert!(store.insert("TSLA", &batch).is_err());
        assert!(store.tickers().unwrap().is_empty());
    }

    #[test]
    fn test_empty_column_list_returns_index_only() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let frame = store.daily("AAPL", &[]).unwrap();
        assert!(frame.columns().is_empty());
        assert_eq!(frame.index(), &[day(2), day(3), day(4)]);
        assert_eq!(frame.row(1).unwrap(), (day(3), vec![]));
    }

    #[test]
    fn test_columns_parsed_from_text() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("AAPL", &sample_batch()).unwrap();

        let columns = PriceColumn::parse_list(&["high", "Low"]).unwrap();
        let frame = store.daily("AAPL", &columns).unwrap();
        assert_eq!(frame.columns(), &[PriceColumn::High, PriceColumn::Low]);
        assert_eq!(frame.get(day(2), PriceColumn::High), Some(186.0));

        let err = PriceColumn::parse_list(&["Close", "adj_close"])
            .and_then(|columns| store.daily("AAPL", &columns))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidColumn(ref name) if name == "adj_close"));
    }

    #[test]
    fn test_tickers_lists_names_resembling_internal_tables() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("SQLITEX", &sample_batch()).unwrap();
        store.insert("sqlite1", &sample_batch()).unwrap();

        assert_eq!(
            store.tickers().unwrap(),
            vec!["SQLITEX".to_string(), "sqlite1".to_string()]
        );
    }

    #[test]
    fn test_ticker_case_is_kept() {
        let mut store = PriceStore::open_in_memory().unwrap();
        store.insert("brk_b", &sample_batch()).unwrap();
        assert_eq!(store.tickers().unwrap(), vec!["brk_b".to_string()]);
    }
}
