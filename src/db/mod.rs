//! Provides database interaction functionalities.
//!
//! Bookmarks are persisted in SQLite via the `sqlite` submodule.

mod sqlite;

pub use sqlite::*;
