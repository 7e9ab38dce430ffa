use serde::{Deserialize, Serialize};

/// A news article as delivered by the ingestion side.
///
/// `url` is the identity; `date` is kept exactly as supplied and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub date: String,
    pub summary: String,
}

impl Article {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            date: date.into(),
            summary: summary.into(),
        }
    }
}
