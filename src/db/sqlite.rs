//! Provides SQLite database interaction functionalities using `sqlx`.
//!
//! Includes capabilities for establishing the connection pool, initializing the schema,
//! and the create/read/search/delete queries behind the bookmark store.

use crate::error::{AppError, Result};
use crate::models::Bookmark;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::{debug, error, info};

/// Represents the database connection pool and provides methods for database operations.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Creates a new `Database` instance by establishing a connection pool.
    ///
    /// An in-memory database lives per connection, so `sqlite::memory:` URLs get a
    /// single-connection pool.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the connection pool cannot be established.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to database...");

        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                AppError::Db(e.into())
            })?;

        info!("Connected to database successfully");
        Ok(Self { pool })
    }

    /// Creates the `bookmarks` table and its indexes if they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if any SQL statement fails.
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema (if necessary)...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to create bookmarks table: {}", e);
            AppError::Db(e.into())
        })?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_bookmarks_title ON bookmarks(title)",
            "CREATE INDEX IF NOT EXISTS idx_bookmarks_url ON bookmarks(url)",
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!("Failed to create index: {}", e);
                    AppError::Db(e.into())
                })?;
        }

        info!("Database schema initialized successfully");
        Ok(())
    }

    /// Inserts a bookmark and returns it with the id SQLite assigned.
    pub async fn insert(&self, url: &str, title: &str) -> Result<Bookmark> {
        let result = sqlx::query("INSERT INTO bookmarks (title, url) VALUES (?, ?)")
            .bind(title)
            .bind(url)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert bookmark for {}: {}", url, e);
                AppError::Db(e.into())
            })?;

        let bookmark = Bookmark::new(result.last_insert_rowid(), title, url);
        debug!("Inserted bookmark {}", bookmark.short_str());
        Ok(bookmark)
    }

    /// Fetches bookmarks ordered by id, skipping `offset` rows and returning at most `limit`.
    ///
    /// `None` for either bound means no offset / no limit.
    pub async fn fetch_all(
        &self,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Bookmark>> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            "SELECT id, title, url FROM bookmarks ORDER BY id LIMIT ? OFFSET ?",
        )
        // SQLite treats a negative LIMIT as unbounded.
        .bind(limit.unwrap_or(-1))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch bookmarks: {}", e);
            AppError::Db(e.into())
        })?;

        debug!("Fetched {} bookmarks", bookmarks.len());
        Ok(bookmarks)
    }

    /// Fetches a single bookmark by id.
    pub async fn fetch_one(&self, id: i64) -> Result<Option<Bookmark>> {
        sqlx::query_as::<_, Bookmark>("SELECT id, title, url FROM bookmarks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to fetch bookmark {}: {}", id, e);
                AppError::Db(e.into())
            })
    }

    /// Case-insensitive substring search on titles.
    pub async fn search_title(&self, term: &str) -> Result<Vec<Bookmark>> {
        self.search("title", term).await
    }

    /// Case-insensitive substring search on urls.
    pub async fn search_url(&self, term: &str) -> Result<Vec<Bookmark>> {
        self.search("url", term).await
    }

    async fn search(&self, column: &str, term: &str) -> Result<Vec<Bookmark>> {
        // `column` is one of two literals from this module, never user input.
        let query = format!(
            "SELECT id, title, url FROM bookmarks WHERE {} LIKE ? ESCAPE '\\' ORDER BY id",
            column
        );
        let pattern = format!("%{}%", escape_like(term));

        let bookmarks = sqlx::query_as::<_, Bookmark>(&query)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to search bookmarks by {}: {}", column, e);
                AppError::Db(e.into())
            })?;

        info!(
            "Search by {} for '{}' matched {} bookmarks",
            column,
            term,
            bookmarks.len()
        );
        Ok(bookmarks)
    }

    /// Deletes a bookmark. Returns `false` when no row had that id.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to delete bookmark {}: {}", id, e);
                AppError::Db(e.into())
            })?;

        let deleted = result.rows_affected() > 0;
        debug!("Delete of bookmark {} affected a row: {}", id, deleted);
        Ok(deleted)
    }

    /// Number of stored bookmarks.
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookmarks")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to count bookmarks: {}", e);
                AppError::Db(e.into())
            })
    }
}

/// Escapes LIKE wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
