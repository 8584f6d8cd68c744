//! Cache Store Module
//!
//! Primary-key cache holding the latest full snapshot of one entity type.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::stats::StatsRecorder;
use crate::cache::{
    Cache, CacheStats, Clock, Condition, Freshness, Identifiable, Refreshable, SystemClock,
};
use crate::error::{CacheError, Result};
use crate::loader::DataLoader;

/// Snapshot plus its freshness, guarded together by one lock.
struct StoreState<T: Identifiable> {
    data: HashMap<T::Id, T>,
    freshness: Freshness,
}

// == Cache Store ==
/// Thread-safe snapshot cache keyed by entity id.
///
/// Reads share a read lock. `refresh` and `clear` take the write lock, and
/// `refresh` holds it across the loader call, so readers always see either
/// the whole old snapshot or the whole new one.
pub struct CacheStore<T: Identifiable> {
    name: String,
    loader: Arc<dyn DataLoader<T>>,
    clock: Arc<dyn Clock>,
    state: RwLock<StoreState<T>>,
    stats: StatsRecorder,
}

impl<T> CacheStore<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    // == Constructor ==
    /// Creates an empty cache bound to `loader` that never expires.
    pub fn new(name: impl Into<String>, loader: impl DataLoader<T> + 'static) -> Self {
        Self {
            name: name.into(),
            loader: Arc::new(loader),
            clock: Arc::new(SystemClock),
            state: RwLock::new(StoreState {
                data: HashMap::new(),
                freshness: Freshness::new(Duration::ZERO),
            }),
            stats: StatsRecorder::default(),
        }
    }

    /// Sets the expiration window. Zero means never expire.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.state.get_mut().freshness.set_ttl(ttl);
        self
    }

    /// Replaces the time source used for expiration checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Changes the expiration window of a cache that is already in use.
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
    /// Returns the entity with `id`.
    ///
    /// Fails with `NotFound` when the id is absent or the cache has expired.
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

    // == Get All ==
    /// Returns every cached entity in unspecified order, or nothing if expired.
    pub fn get_all(&self) -> Vec<T> {
        let state = self.state.read();
        if state.freshness.is_expired(self.clock.now()) {
            return Vec::new();
        }
        state.data.values().cloned().collect()
    }

    // == Query ==
    /// Returns the entities matching `condition`, or nothing if expired.
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
    /// Replaces the snapshot with a fresh one from the loader.
    ///
    /// On loader failure the previous snapshot and its fetch time are kept.
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

        state.data = items.into_iter().map(|item| (item.id(), item)).collect();
        state.freshness.mark_fetched(self.clock.now(), self.clock.utc_now());
        self.stats.record_refresh();

        info!(
            "Refreshed cache '{}' with {} entries",
            self.name,
            state.data.len()
        );
        Ok(())
    }

    // == Clear ==
    /// Drops every cached entity without contacting the loader.
    ///
    /// The fetch time and TTL are left as they are.
    pub fn clear(&self) {
        self.state.write().data.clear();
        debug!("Cleared cache '{}'", self.name);
    }

    /// Number of entities in the snapshot, whether expired or not.
    pub fn len(&self) -> usize {
        self.state.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().data.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.state.read().freshness.is_expired(self.clock.now())
    }

    /// Time left before expiry, see [`Freshness::ttl_remaining`].
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.state.read().freshness.ttl_remaining(self.clock.now())
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().freshness.refreshed_at()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        self.stats.snapshot(
            state.data.len(),
            state.freshness.is_expired(self.clock.now()),
            state.freshness.refreshed_at(),
        )
    }
}

impl<T> Cache<T> for CacheStore<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    fn get(&self, id: &T::Id) -> Result<T> {
        CacheStore::get(self, id)
    }

    fn get_all(&self) -> Vec<T> {
        CacheStore::get_all(self)
    }

    fn query(&self, condition: &dyn Condition<T>) -> Vec<T> {
        CacheStore::query(self, condition)
    }

    fn refresh(&self) -> Result<()> {
        CacheStore::refresh(self)
    }

    fn clear(&self) {
        CacheStore::clear(self)
    }
}

impl<T> Refreshable for CacheStore<T>
where
    T: Identifiable + Clone + Send + Sync,
{
    fn name(&self) -> &str {
        CacheStore::name(self)
    }

    fn refresh(&self) -> Result<()> {
        CacheStore::refresh(self)
    }

    fn len(&self) -> usize {
        CacheStore::len(self)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CompositeCondition, ManualClock, StringCondition, StringOp};
    use crate::loader::StaticLoader;
    use crate::models::User;

    const TTL: Duration = Duration::from_secs(300);

    fn user(id: u64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn test_users() -> Vec<User> {
        vec![
            user(1, "John", "john@example.com"),
            user(2, "Jane", "jane@example.com"),
            user(3, "John Smith", "john.smith@example.com"),
        ]
    }

    fn create_store(ttl: Duration) -> (CacheStore<User>, StaticLoader<User>, ManualClock) {
        let loader = StaticLoader::new(test_users());
        let clock = ManualClock::new();
        let store = CacheStore::new("users", loader.clone())
            .with_ttl(ttl)
            .with_clock(Arc::new(clock.clone()));
        (store, loader, clock)
    }

    fn sorted_ids(users: &[User]) -> Vec<u64> {
        let mut ids: Vec<u64> = users.iter().map(|u| u.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_store_new_is_empty() {
        let (store, _, _) = create_store(TTL);
        assert!(store.is_empty());
        assert!(!store.is_expired());
        assert!(store.get_all().is_empty());
        assert!(matches!(store.get(&1), Err(CacheError::NotFound(_))));
        assert!(store.last_refreshed().is_none());
    }

    #[test]
    fn test_default_ttl_never_expires() {
        let store = CacheStore::new("users", StaticLoader::new(test_users()));
        assert_eq!(store.ttl(), Duration::ZERO);
    }

    #[test]
    fn test_refresh_loads_data() {
        let (store, _, _) = create_store(TTL);
        store.refresh().unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(sorted_ids(&store.get_all()), vec![1, 2, 3]);
        assert_eq!(store.get(&2).unwrap().name, "Jane");
        assert!(store.last_refreshed().is_some());
    }

    #[test]
    fn test_get_nonexistent() {
        let (store, _, _) = create_store(TTL);
        store.refresh().unwrap();

        let result = store.get(&999);
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_ttl_expiration() {
        let (store, _, clock) = create_store(TTL);
        store.refresh().unwrap();

        clock.advance(TTL);
        assert!(store.get(&1).is_ok());
        assert_eq!(store.get_all().len(), 3);

        clock.advance(Duration::from_millis(1));
        assert!(store.is_expired());
        assert!(matches!(store.get(&1), Err(CacheError::NotFound(_))));
        assert!(store.get_all().is_empty());
        assert!(store.query(&|_: &User| true).is_empty());

        // Stale data stays in place until the next refresh
        assert_eq!(store.len(), 3);

        store.refresh().unwrap();
        assert!(!store.is_expired());
        assert!(store.get(&1).is_ok());
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let (store, _, clock) = create_store(Duration::ZERO);
        store.refresh().unwrap();

        clock.advance(Duration::from_secs(86_400 * 30));
        assert!(!store.is_expired());
        assert_eq!(store.get_all().len(), 3);
        assert!(store.ttl_remaining().is_none());
    }

    #[test]
    fn test_set_ttl_applies_to_next_read() {
        let (store, _, clock) = create_store(Duration::ZERO);
        store.refresh().unwrap();
        clock.advance(Duration::from_secs(10));

        store.set_ttl(Duration::from_secs(5));
        assert!(store.get_all().is_empty());

        store.set_ttl(Duration::from_secs(60));
        assert_eq!(store.get_all().len(), 3);
        assert_eq!(store.ttl_remaining(), Some(Duration::from_secs(50)));
    }

    #[test]
    fn test_refresh_failure_preserves_state() {
        let (store, loader, _) = create_store(TTL);
        store.refresh().unwrap();
        let refreshed_at = store.last_refreshed();

        loader.fail_with("database unavailable");
        let result = store.refresh();

        assert!(matches!(result, Err(CacheError::LoaderFailure { .. })));
        assert_eq!(sorted_ids(&store.get_all()), vec![1, 2, 3]);
        assert_eq!(store.last_refreshed(), refreshed_at);

        let stats = store.stats();
        assert_eq!(stats.refreshes, 1);
        assert_eq!(stats.failed_refreshes, 1);
    }

    #[test]
    fn test_failed_refresh_does_not_extend_ttl() {
        let (store, loader, clock) = create_store(TTL);
        store.refresh().unwrap();

        clock.advance(Duration::from_secs(200));
        loader.fail_with("timeout");
        assert!(store.refresh().is_err());

        clock.advance(Duration::from_secs(101));
        assert!(store.is_expired());
    }

    #[test]
    fn test_refresh_replaces_whole_snapshot() {
        let (store, loader, _) = create_store(TTL);
        store.refresh().unwrap();

        loader.set(vec![user(4, "Alice", "alice@example.com")]);
        store.refresh().unwrap();

        assert_eq!(sorted_ids(&store.get_all()), vec![4]);
        assert!(store.get(&1).is_err());
    }

    #[test]
    fn test_clear_removes_all_items() {
        let (store, _, _) = create_store(Duration::ZERO);
        store.refresh().unwrap();

        store.clear();
        assert!(store.get_all().is_empty());
        assert!(!store.is_expired());
        assert!(store.last_refreshed().is_some());

        store.refresh().unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_query_by_name_equality() {
        let (store, _, _) = create_store(TTL);
        store.refresh().unwrap();

        let condition = StringCondition::new(|u: &User| u.name.as_str(), StringOp::Equals, "John");
        let results = store.query(&condition);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "John");
    }

    #[test]
    fn test_query_by_name_contains() {
        let (store, _, _) = create_store(TTL);
        store.refresh().unwrap();

        let condition =
            StringCondition::new(|u: &User| u.name.as_str(), StringOp::Contains, "John");
        assert_eq!(sorted_ids(&store.query(&condition)), vec![1, 3]);
    }

    #[test]
    fn test_composite_query() {
        let (store, _, _) = create_store(TTL);
        store.refresh().unwrap();

        let composite = CompositeCondition::all_of(vec![
            Box::new(StringCondition::new(
                |u: &User| u.name.as_str(),
                StringOp::Contains,
                "John",
            )),
            Box::new(StringCondition::new(
                |u: &User| u.email.as_str(),
                StringOp::Contains,
                "smith",
            )),
        ]);

        let results = store.query(&composite);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "John Smith");
    }

    #[test]
    fn test_query_through_cache_trait() {
        let (store, _, _) = create_store(TTL);
        let cache: &dyn Cache<User> = &store;
        cache.refresh().unwrap();

        let condition =
            StringCondition::new(|u: &User| u.name.as_str(), StringOp::StartsWith, "Ja");
        assert_eq!(sorted_ids(&cache.query(&condition)), vec![2]);
    }

    #[test]
    fn test_last_refreshed_follows_clock() {
        let (store, _, clock) = create_store(TTL);
        clock.advance(Duration::from_secs(3600));
        store.refresh().unwrap();

        assert_eq!(store.last_refreshed(), Some(clock.utc_now()));
        assert_eq!(store.stats().last_refreshed, Some(clock.utc_now()));
    }

    #[test]
    fn test_store_stats() {
        let (store, _, _) = create_store(TTL);
        store.refresh().unwrap();

        store.get(&1).unwrap();
        let _ = store.get(&999);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 3);
        assert!(!stats.expired);
    }

    #[test]
    fn test_readers_see_whole_snapshots() {
        let old: Vec<User> = (0..50).map(|i| user(i, "old", "old@example.com")).collect();
        let new: Vec<User> = (100..200).map(|i| user(i, "new", "new@example.com")).collect();

        let loader = StaticLoader::new(old);
        let store = CacheStore::new("users", loader.clone());
        store.refresh().unwrap();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let all = store.get_all();
                        assert!(all.len() == 50 || all.len() == 100);
                        let first = &all[0].name;
                        assert!(all.iter().all(|u| &u.name == first));
                    }
                });
            }
            s.spawn(|| {
                for i in 0..50 {
                    if i % 2 == 0 {
                        loader.set(new.clone());
                    } else {
                        loader.set((0..50).map(|i| user(i, "old", "old@example.com")).collect());
                    }
                    store.refresh().unwrap();
                }
            });
        });
    }
}
