//! Tabular price data
//!
//! `PriceBatch` is what the market-data side hands in: rows keyed by a
//! date-like index with Open/High/Low/Close/Volume values. `DailyFrame` is
//! what comes back out: a date-indexed table holding the requested columns
//! in the order they were asked for.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One daily bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Share count, kept as floating point like the rest of the bar
    pub volume: f64,
}

impl PriceBar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self { open, high, low, close, volume }
    }
}

/// A bar together with its index value in string form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceRow {
    pub date: String,
    #[serde(flatten)]
    pub bar: PriceBar,
}

/// Insert-side price dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceBatch {
    rows: Vec<PriceRow>,
}

impl PriceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bar. The index is stored as its `Display` form, so a
    /// `NaiveDate` becomes `2024-01-02` and a `NaiveDateTime`
    /// becomes `2024-01-02 00:00:00`.
    pub fn push(&mut self, date: impl fmt::Display, bar: PriceBar) {
        self.rows.push(PriceRow { date: date.to_string(), bar });
    }

    pub fn with(mut self, date: impl fmt::Display, bar: PriceBar) -> Self {
        self.push(date, bar);
        self
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<PriceRow>> for PriceBatch {
    fn from(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }
}

impl<D: fmt::Display> FromIterator<(D, PriceBar)> for PriceBatch {
    fn from_iter<I: IntoIterator<Item = (D, PriceBar)>>(iter: I) -> Self {
        let mut batch = Self::new();
        for (date, bar) in iter {
            batch.push(date, bar);
        }
        batch
    }
}

/// Value columns of a ticker table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceColumn {
    pub const ALL: [PriceColumn; 5] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
        PriceColumn::Volume,
    ];

    /// Column name inside the ticker table
    pub fn sql_name(&self) -> &'static str {
        match self {
            PriceColumn::Open => "open",
            PriceColumn::High => "high",
            PriceColumn::Low => "low",
            PriceColumn::Close => "close",
            PriceColumn::Volume => "volume",
        }
    }

    /// Column label in a `DailyFrame`
    pub fn label(&self) -> &'static str {
        match self {
            PriceColumn::Open => "Open",
            PriceColumn::High => "High",
            PriceColumn::Low => "Low",
            PriceColumn::Close => "Close",
            PriceColumn::Volume => "Volume",
        }
    }

    /// Parse column names given as text, e.g. from a `--columns` flag
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<PriceColumn>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PriceColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PriceColumn::ALL
            .into_iter()
            .find(|c| c.sql_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidColumn(s.to_string()))
    }
}

/// Date-indexed result of a price query.
///
/// Values are stored column-major; `data[i]` belongs to `columns[i]`.
/// Missing cells read back as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyFrame {
    index: Vec<NaiveDateTime>,
    columns: Vec<PriceColumn>,
    data: Vec<Vec<f64>>,
}

impl DailyFrame {
    pub fn new(columns: Vec<PriceColumn>) -> Self {
        let data = vec![Vec::new(); columns.len()];
        Self { index: Vec::new(), columns, data }
    }

    /// Append one row; `values` must follow the column order
    pub(crate) fn push_row(&mut self, date: NaiveDateTime, values: &[f64]) {
        debug_assert_eq!(values.len(), self.columns.len());
        self.index.push(date);
        for (column, value) in self.data.iter_mut().zip(values) {
            column.push(*value);
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    pub fn column(&self, column: PriceColumn) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|i| self.data[i].as_slice())
    }

    /// Value at `date` in `column`, first match
    pub fn get(&self, date: NaiveDateTime, column: PriceColumn) -> Option<f64> {
        let row = self.index.iter().position(|d| *d == date)?;
        self.column(column).map(|values| values[row])
    }

    /// Row `i` as (date, values in column order)
    pub fn row(&self, i: usize) -> Option<(NaiveDateTime, Vec<f64>)> {
        let date = *self.index.get(i)?;
        Some((date, self.data.iter().map(|c| c[i]).collect()))
    }

    /// Records-oriented JSON: `[{"Date": "...", "Close": 1.0}, ...]`
    pub fn to_json(&self) -> serde_json::Value {
        let records = (0..self.len())
            .map(|i| {
                let mut record = serde_json::Map::new();
                record.insert("Date".to_string(), self.index[i].to_string().into());
                for (column, values) in self.columns.iter().zip(&self.data) {
                    record.insert(column.label().to_string(), values[i].into());
                }
                serde_json::Value::Object(record)
            })
            .collect();
        serde_json::Value::Array(records)
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
];

/// Parse a stored date key.
///
/// Accepts plain dates, date-times with a space or `T` separator, and
/// either with a trailing UTC offset. The `Display` forms of chrono's
/// `DateTime<Utc>` (` UTC` suffix) and `DateTime<FixedOffset>` (space before
/// the offset) are accepted too. An offset is dropped and the wall-clock
/// time kept.
pub fn parse_date(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    let s = s.strip_suffix(" UTC").unwrap_or(s);

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.naive_local());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::DateParse(s.to_string()))
}
