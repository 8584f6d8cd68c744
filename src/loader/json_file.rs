//! Loader reading a JSON array of entities from a file.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::{DataLoader, LoadError};
use crate::cache::Condition;

// == JSON File Loader ==
/// Reads the whole file on every load, so edits are picked up by the next
/// refresh.
pub struct JsonFileLoader<T> {
    path: PathBuf,
    conditions: Vec<Box<dyn Condition<T>>>,
    debug: bool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> JsonFileLoader<T> {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conditions: Vec::new(),
            debug: false,
            _entity: PhantomData,
        }
    }

    /// Keeps only rows matching `condition`. Repeated calls are combined with AND.
    pub fn with_condition(mut self, condition: impl Condition<T> + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Logs every load with its source path and row counts.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl<T> fmt::Debug for JsonFileLoader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFileLoader")
            .field("path", &self.path)
            .field("conditions", &self.conditions.len())
            .field("debug", &self.debug)
            .finish()
    }
}

impl<T> DataLoader<T> for JsonFileLoader<T>
where
    T: DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>, LoadError> {
        let raw = fs::read_to_string(&self.path)?;
        let rows: Vec<T> = serde_json::from_str(&raw)?;
        let total = rows.len();

        let items: Vec<T> = rows
            .into_iter()
            .filter(|row| self.conditions.iter().all(|c| c.matches(row)))
            .collect();

        if self.debug {
            info!(
                "Loaded {} of {} rows from {}",
                items.len(),
                total,
                self.path.display()
            );
        }

        Ok(items)
    }
}
