// Movie Catalog - Core Library
// Catalog, event log and JSON persistence, used by the TUI binary and tests

pub mod error;
pub mod movie;
pub mod event_log;
pub mod catalog;
pub mod persistence;
pub mod config;

// Re-export commonly used types
pub use error::{CatalogError, Result};
pub use movie::MovieRecord;
pub use event_log::{Event, EventLog};
pub use catalog::{Catalog, RatingHandle};
pub use persistence::{JsonCodec, MOVIES_KEY};
pub use config::{Config, LoadPolicy, CATALOG_PATH_ENV, DEFAULT_CATALOG_PATH, USAGE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
