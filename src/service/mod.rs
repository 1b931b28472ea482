//! The bookmark store as seen by the command layer.
//!
//! Commands only talk to the `BookmarkService` trait; `BookmarkManager` is the
//! production implementation backed by SQLite and the HTTP title fetcher.

mod manager;

pub use manager::*;

use crate::error::Result;
use crate::models::Bookmark;
use async_trait::async_trait;

/// CRUD and search operations over stored bookmarks.
#[async_trait]
pub trait BookmarkService: Send + Sync {
    /// Stores a new bookmark. `Ok(None)` means the url/title pair was rejected.
    async fn create(&self, url: &str, title: &str) -> Result<Option<Bookmark>>;

    /// All bookmarks, or the window `[start, start + count)` when both bounds are given.
    async fn get_all(&self, start: Option<i64>, count: Option<i64>) -> Result<Vec<Bookmark>>;

    async fn get_one(&self, id: i64) -> Result<Option<Bookmark>>;

    async fn get_by_title(&self, term: &str) -> Result<Vec<Bookmark>>;

    async fn get_by_url(&self, term: &str) -> Result<Vec<Bookmark>>;

    /// Removes a bookmark. `Ok(false)` when the id did not exist.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Title of the page behind `url`, or `None` if the url cannot be resolved.
    async fn get_title_by_url(&self, url: &str) -> Result<Option<String>>;

    async fn count(&self) -> Result<i64>;
}
