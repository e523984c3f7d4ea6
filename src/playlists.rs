//! Playlist discovery and the playlist data model.
//!
//! `scan` builds a [`Catalog`] of playlist files under a directory and
//! `filter` narrows it down by name. The abstract playlist types exchanged
//! with the orchestrator live in `model`.

mod filter;
mod model;
mod scan;

pub use filter::{NameFilter, filter_names};
pub use model::*;
pub use scan::scan;
