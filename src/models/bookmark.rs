//! The bookmark entity and its JSON interchange documents.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored bookmark. The `id` is assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
}

impl Bookmark {
    pub fn new(id: i64, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            url: url.into(),
        }
    }

    /// Compact `"<id> <title>"` form used in confirmations and listings.
    pub fn short_str(&self) -> String {
        format!("{} {}", self.id, self.title)
    }
}

// --- Export/Import documents ---

/// One exported bookmark. Field order is alphabetical so the serialized keys come out sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedBookmark {
    pub title: String,
    pub url: String,
}

impl From<&Bookmark> for ExportedBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
        }
    }
}

/// Top-level document written by `export`: `{"bookmarks": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub bookmarks: Vec<ExportedBookmark>,
}

/// One record of an import file. Missing fields are tolerated here and
/// rejected per record when the bookmark is created.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRecord {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Top-level document read by `import`: `{"db": [...]}`.
///
/// Files produced by `export` use the key `bookmarks`, which is accepted as well.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportDocument {
    #[serde(alias = "bookmarks")]
    pub db: Vec<ImportRecord>,
}
