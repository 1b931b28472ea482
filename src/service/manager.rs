use super::BookmarkService;
use crate::api::TitleFetcher;
use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::models::Bookmark;
use async_trait::async_trait;
use tracing::{info, warn};

/// Bookmark store backed by SQLite, with page titles resolved over HTTP.
pub struct BookmarkManager {
    db: Database,
    fetcher: TitleFetcher,
}

impl BookmarkManager {
    pub fn new(db: Database, fetcher: TitleFetcher) -> Self {
        Self { db, fetcher }
    }

    /// Connects to the configured database, makes sure the schema exists and builds
    /// the title fetcher.
    pub async fn connect(config: &Config) -> Result<Self> {
        let db = Database::new(&config.database_url).await?;
        db.init_schema().await?;
        let fetcher = TitleFetcher::new(config.http_timeout)?;
        Ok(Self::new(db, fetcher))
    }
}

#[async_trait]
impl BookmarkService for BookmarkManager {
    async fn create(&self, url: &str, title: &str) -> Result<Option<Bookmark>> {
        let (url, title) = (url.trim(), title.trim());
        if url.is_empty() || title.is_empty() {
            warn!("Rejected bookmark with url '{}' and title '{}'", url, title);
            return Ok(None);
        }
        let bookmark = self.db.insert(url, title).await?;
        info!("Created bookmark {}", bookmark.short_str());
        Ok(Some(bookmark))
    }

    async fn get_all(&self, start: Option<i64>, count: Option<i64>) -> Result<Vec<Bookmark>> {
        self.db.fetch_all(start, count).await
    }

    async fn get_one(&self, id: i64) -> Result<Option<Bookmark>> {
        self.db.fetch_one(id).await
    }

    async fn get_by_title(&self, term: &str) -> Result<Vec<Bookmark>> {
        self.db.search_title(term).await
    }

    async fn get_by_url(&self, term: &str) -> Result<Vec<Bookmark>> {
        self.db.search_url(term).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.db.delete(id).await?;
        if deleted {
            info!("Deleted bookmark {}", id);
        }
        Ok(deleted)
    }

    async fn get_title_by_url(&self, url: &str) -> Result<Option<String>> {
        if url.trim().is_empty() {
            return Ok(None);
        }
        Ok(self.fetcher.fetch_title(url).await)
    }

    async fn count(&self) -> Result<i64> {
        self.db.count().await
    }
}
