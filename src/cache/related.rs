//! Related Cache Store Module
//!
//! Snapshot cache with a secondary index from foreign key to the primary keys
//! of the entities referencing it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::stats::StatsRecorder;
use crate::cache::{
    Cache, CacheStats, Clock, Condition, ForeignKeyable, Freshness, RelatedCache, Refreshable,
    SystemClock,
};
use crate::error::{CacheError, Result};
use crate::loader::DataLoader;

struct RelatedState<T: ForeignKeyable> {
    data: HashMap<T::Id, T>,
    /// Foreign key -> primary keys, in snapshot order
    fk_index: HashMap<T::ForeignKey, Vec<T::Id>>,
    freshness: Freshness,
}

// == Related Cache Store ==
/// Cache for child entities that are usually looked up by parent.
///
/// Shares the locking and expiry rules of [`CacheStore`](crate::cache::CacheStore).
/// The index is rebuilt from scratch on every refresh.
pub struct RelatedCacheStore<T: ForeignKeyable> {
    name: String,
    loader: Arc<dyn DataLoader<T>>,
    clock: Arc<dyn Clock>,
    state: RwLock<RelatedState<T>>,
    stats: StatsRecorder,
}

impl<T> RelatedCacheStore<T>
where
    T: ForeignKeyable + Clone + Send + Sync,
{
    // == Constructor ==
    /// Creates an empty cache bound to `loader`.
    ///
    /// A zero `ttl` means the snapshot never expires.
    pub fn new(
        name: impl Into<String>,
        loader: impl DataLoader<T> + 'static,
        ttl: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            loader: Arc::new(loader),
            clock: Arc::new(SystemClock),
            state: RwLock::new(RelatedState {
                data: HashMap::new(),
                fk_index: HashMap::new(),
                freshness: Freshness::new(ttl),
            }),
            stats: StatsRecorder::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_ttl(&self, ttl: Duration) {
        self.state.write().freshness.set_ttl(ttl);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.state.read().freshness.ttl()
    }

    // == Get ==
    /// Returns the entity with `id`, or `NotFound` if absent or expired.
    pub fn get(&self, id: &T::Id) -> Result<T> {
        let state = self.state.read();

        if state.freshness.is_expired(self.clock.now()) {
            self.stats.record_miss();
            debug!("Cache '{}' expired, lookup of {:?} missed", self.name, id);
            return Err(CacheError::NotFound(format!(
                "cache '{}' has expired",
                self.name
            )));
        }

        match state.data.get(id) {
            Some(item) => {
                self.stats.record_hit();
                Ok(item.clone())
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound(format!(
                    "item {:?} not found in cache '{}'",
                    id, self.name
                )))
            }
        }
    }

    /// Whether `id` is present in a non-expired snapshot.
    pub fn contains(&self, id: &T::Id) -> bool {
        let state = self.state.read();
        !state.freshness.is_expired(self.clock.now()) && state.data.contains_key(id)
    }

    // == Get By Foreign Key ==
    /// Returns every entity whose foreign key equals `key`, in the order the
    /// last snapshot listed them.
    pub fn get_by_foreign_key(&self, key: &T::ForeignKey) -> Vec<T> {
        let state = self.state.read();
        if state.freshness.is_expired(self.clock.now()) {
            return Vec::new();
        }

        let Some(ids) = state.fk_index.get(key) else {
            return Vec::new();
        };

        ids.iter()
            .filter_map(|id| state.data.get(id))
            .cloned()
            .collect()
    }

    /// Distinct foreign-key values in the current snapshot.
    pub fn foreign_keys(&self) -> Vec<T::ForeignKey> {
        let state = self.state.read();
        if state.freshness.is_expired(self.clock.now()) {
            return Vec::new();
        }
        state.fk_index.keys().cloned().collect()
    }

    pub fn get_all(&self) -> Vec<T> {
        let state = self.state.read();
        if state.freshness.is_expired(self.clock.now()) {
            return Vec::new();
        }
        state.data.values().cloned().collect()
    }

    pub fn query<C>(&self, condition: &C) -> Vec<T>
    where
        C: Condition<T> + ?Sized,
    {
        let state = self.state.read();
        if state.freshness.is_expired(self.clock.now()) {
            return Vec::new();
        }
        state
            .data
            .values()
            .filter(|item| condition.matches(item))
            .cloned()
            .collect()
    }

    // == Refresh ==
    /// Rebuilds the snapshot and the foreign-key index from the loader.
    ///
    /// On loader failure both are left untouched.
    pub fn refresh(&self) -> Result<()> {
        let mut state = self.state.write();

        let items = match self.loader.load() {
            Ok(items) => items,
            Err(err) => {
                self.stats.record_failed_refresh();
                warn!("Refresh of cache '{}' failed: {}", self.name, err);
                return Err(CacheError::loader_failure(&self.name, err));
            }
        };

        let mut data: HashMap<T::Id, T> = HashMap::with_capacity(items.len());
        let mut fk_index: HashMap<T::ForeignKey, Vec<T::Id>> = HashMap::new();

        // A repeated id keeps the last entity, indexed under its key only
        for item in items {
            let id = item.id();
            let key = item.foreign_key();
            if let Some(previous) = data.insert(id.clone(), item) {
                let previous_key = previous.foreign_key();
                if let Some(bucket) = fk_index.get_mut(&previous_key) {
                    bucket.retain(|existing| existing != &id);
                    if bucket.is_empty() {
                        fk_index.remove(&previous_key);
                    }
                }
            }
            fk_index.entry(key).or_default().push(id);
        }

        state.data = data;
        state.fk_index = fk_index;
        state.freshness.mark_fetched(self.clock.now(), self.clock.utc_now());
        self.stats.record_refresh();

        info!(
            "Refreshed cache '{}' with {} entries under {} foreign keys",
            self.name,
            state.data.len(),
            state.fk_index.len()
        );
        Ok(())
    }

    // == Clear ==
    /// Drops the snapshot and the index without contacting the loader.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.data.clear();
        state.fk_index.clear();
        debug!("Cleared cache '{}'", self.name);
    }

    pub fn len(&self) -> usize {
        self.state.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().data.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.state.read().freshness.is_expired(self.clock.now())
    }

    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.state.read().freshness.ttl_remaining(self.clock.now())
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().freshness.refreshed_at()
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        self.stats.snapshot(
            state.data.len(),
            state.freshness.is_expired(self.clock.now()),
            state.freshness.refreshed_at(),
        )
    }
}

impl<T> Cache<T> for RelatedCacheStore<T>
where
    T: ForeignKeyable + Clone + Send + Sync,
{
    fn get(&self, id: &T::Id) -> Result<T> {
        RelatedCacheStore::get(self, id)
    }

    fn get_all(&self) -> Vec<T> {
        RelatedCacheStore::get_all(self)
    }

    fn query(&self, condition: &dyn Condition<T>) -> Vec<T> {
        RelatedCacheStore::query(self, condition)
    }

    fn refresh(&self) -> Result<()> {
        RelatedCacheStore::refresh(self)
    }

    fn clear(&self) {
        RelatedCacheStore::clear(self)
    }
}

impl<T> RelatedCache<T> for RelatedCacheStore<T>
where
    T: ForeignKeyable + Clone + Send + Sync,
{
    fn get_by_foreign_key(&self, key: &T::ForeignKey) -> Vec<T> {
        RelatedCacheStore::get_by_foreign_key(self, key)
    }
}

impl<T> Refreshable for RelatedCacheStore<T>
where
    T: ForeignKeyable + Clone + Send + Sync,
{
    fn name(&self) -> &str {
        RelatedCacheStore::name(self)
    }

    fn refresh(&self) -> Result<()> {
        RelatedCacheStore::refresh(self)
    }

    fn len(&self) -> usize {
        RelatedCacheStore::len(self)
    }
}
