//! Defines the data structures and models used throughout the application.
//!
//! This includes the stored `Bookmark` entity and the JSON documents used by
//! the export and import commands.

mod bookmark;

pub use bookmark::*;
