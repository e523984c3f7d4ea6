//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive sync jobs
//! and helpers to load configuration from disk.

mod load;
mod schema;

pub use load::{config_home, default_config_path, resolve_config_path};
pub use schema::*;
