//! Article store

use std::path::Path;

use rusqlite::{OptionalExtension, params};

use super::connection::Database;
use super::schema::{self, ConflictPolicy};
use super::conflict_error;
use crate::article::Article;
use crate::config::ARTICLES_DB;
use crate::Result;

/// News articles keyed by URL
pub struct ArticleStore {
    db: Database,
}

impl ArticleStore {
    /// Open `<root>/databases/reuters.db` and make sure the table exists
    pub fn open(root: &Path) -> Result<Self> {
        let store = Self { db: Database::open(root, ARTICLES_DB)? };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let store = Self { db: Database::open_in_memory()? };
        store.ensure_schema()?;
        Ok(store)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create the articles table if it is missing
    pub fn ensure_schema(&self) -> Result<()> {
        tracing::debug!("Ensuring articles table");
        self.db.connection().execute(schema::CREATE_ARTICLES_TABLE, [])?;
        Ok(())
    }

    /// Insert a batch, silently skipping URLs that are already stored.
    ///
    /// Returns the number of rows written.
    pub fn insert(&mut self, articles: &[Article]) -> Result<usize> {
        self.insert_with(articles, ConflictPolicy::Ignore)
    }

    /// Insert a batch in one transaction under the given conflict policy
    pub fn insert_with(&mut self, articles: &[Article], policy: ConflictPolicy) -> Result<usize> {
        tracing::info!("Inserting {} articles ({:?})", articles.len(), policy);

        let sql = format!(
            "{} INTO articles (url, title, date, summary) VALUES (?1, ?2, ?3, ?4)",
            policy.insert_verb()
        );

        let tx = self.db.connection_mut().transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for article in articles {
                written += stmt
                    .execute(params![article.url, article.title, article.date, article.summary])
                    .map_err(|e| conflict_error(e, "articles", &article.url))?;
            }
        }
        tx.commit()?;

        tracing::debug!("{} of {} articles written", written, articles.len());
        Ok(written)
    }

    /// Every stored article, in the order the engine returns them
    pub fn list(&self) -> Result<Vec<Article>> {
        tracing::info!("Retrieving news articles");
        let mut stmt = self
            .db
            .connection()
            .prepare("SELECT url, title, date, summary FROM articles")?;

        let articles = stmt
            .query_map([], row_to_article)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(articles)
    }

    /// Look up one article by URL
    pub fn get(&self, url: &str) -> Result<Option<Article>> {
        self.db
            .connection()
            .query_row(
                "SELECT url, title, date, summary FROM articles WHERE url = ?1",
                [url],
                row_to_article,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all articles
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .connection()
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
    Ok(Article {
        url: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        summary: row.get(3)?,
    })
}
