//! Loader Module
//!
//! A loader produces the full current snapshot of one entity type. The cache
//! only calls it from `refresh`; how the snapshot is obtained is up to the
//! implementation.

mod json_file;
mod static_loader;

use std::io;

use thiserror::Error;

pub use json_file::JsonFileLoader;
pub use static_loader::StaticLoader;

// == Load Error ==
/// Errors a loader may report.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the underlying source failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source returned data that could not be decoded
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Any other source-specific failure
    #[error("{0}")]
    Source(String),
}

// == Data Loader ==
/// Produces the complete current set of entities of type `T`.
///
/// Must never return partial results on success.
pub trait DataLoader<T>: Send + Sync {
    fn load(&self) -> Result<Vec<T>, LoadError>;
}

impl<T, F> DataLoader<T> for F
where
    F: Fn() -> Result<Vec<T>, LoadError> + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>, LoadError> {
        self()
    }
}
