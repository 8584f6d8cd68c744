//! multicache - In-process snapshot caches
//!
//! Loads full snapshots from pluggable loaders into thread-safe stores with TTL
//! expiration, a foreign-key index and composable query conditions. A small
//! HTTP API exposes the demo user and order caches.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{
    Cache, CacheStore, Condition, ForeignKeyable, Identifiable, RelatedCache, RelatedCacheStore,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use loader::{DataLoader, LoadError};
pub use tasks::spawn_refresh_task;
