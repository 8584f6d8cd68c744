//! In-memory loader backed by a shared, replaceable snapshot.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{DataLoader, LoadError};

#[derive(Debug)]
enum Source<T> {
    Items(Vec<T>),
    Failing(String),
}

// == Static Loader ==
/// Serves a fixed snapshot from memory.
///
/// Cloning yields another handle to the same snapshot, so a caller can keep a
/// handle after passing one to a cache and later swap the data (or make the
/// next loads fail).
#[derive(Debug)]
pub struct StaticLoader<T> {
    source: Arc<RwLock<Source<T>>>,
}

impl<T> Clone for StaticLoader<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<T> StaticLoader<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            source: Arc::new(RwLock::new(Source::Items(items))),
        }
    }

    /// Replaces the snapshot served by subsequent loads.
    pub fn set(&self, items: Vec<T>) {
        *self.source.write() = Source::Items(items);
    }

    /// Makes every subsequent load fail with `message` until `set` is called.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.source.write() = Source::Failing(message.into());
    }
}

impl<T> DataLoader<T> for StaticLoader<T>
where
    T: Clone + Send + Sync,
{
    fn load(&self) -> Result<Vec<T>, LoadError> {
        match &*self.source.read() {
            Source::Items(items) => Ok(items.clone()),
            Source::Failing(message) => Err(LoadError::Source(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_loader_serves_items() {
        let loader = StaticLoader::new(vec!["a", "b"]);
        assert_eq!(loader.load().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_clone_shares_snapshot() {
        let loader = StaticLoader::new(vec![1]);
        let handle = loader.clone();
        handle.set(vec![1, 2]);
        assert_eq!(loader.load().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_fail_with_then_set_recovers() {
        let loader = StaticLoader::new(vec![1]);
        loader.fail_with("connection refused");
        assert!(matches!(
            loader.load(),
            Err(LoadError::Source(msg)) if msg == "connection refused"
        ));

        loader.set(vec![2]);
        assert_eq!(loader.load().unwrap(), vec![2]);
    }
}
