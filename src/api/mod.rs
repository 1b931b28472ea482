//! Provides clients for talking to the outside world over HTTP.
//!
//! Includes:
//! - `title`: resolves the page title of a bookmarked URL.

mod title;

pub use title::*;
