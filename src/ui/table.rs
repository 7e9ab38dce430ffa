use tabled::{builder::Builder, settings::Style};

use crate::article::Article;
use crate::frame::DailyFrame;

/// Rounded table with a header row and string cells
pub struct TableBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let mut builder = Builder::default();
        builder.push_record(self.header.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }
}

/// Date column followed by the frame's value columns
pub fn frame_table(frame: &DailyFrame) -> String {
    let header = std::iter::once("Date").chain(frame.columns().iter().map(|c| c.label()));
    let mut builder = TableBuilder::new(header);

    for i in 0..frame.len() {
        if let Some((date, values)) = frame.row(i) {
            let mut row = vec![date.to_string()];
            row.extend(values.iter().map(|v| format_value(*v)));
            builder.add_row(row);
        }
    }

    builder.build()
}

pub fn articles_table(articles: &[Article]) -> String {
    let mut builder = TableBuilder::new(["Date", "Title", "URL"]);
    for article in articles {
        builder.add_row(vec![article.date.clone(), article.title.clone(), article.url.clone()]);
    }
    builder.build()
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}
