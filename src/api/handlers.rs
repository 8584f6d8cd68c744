//! API Handlers
//!
//! HTTP request handlers translating query strings into cache reads.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::cache::{CacheStore, NumberCondition, NumberOp, RelatedCacheStore, Refreshable};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::loader::{JsonFileLoader, StaticLoader};
use crate::models::{
    demo_orders, demo_users, CacheStatsEntry, HealthResponse, HighValueQuery, Order,
    RefreshResponse, RefreshedCache, SearchQuery, StatsResponse, User, UserOrdersQuery, UserQuery,
};

/// Application state shared across all handlers.
///
/// Each cache does its own locking, so the state only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<CacheStore<User>>,
    pub orders: Arc<RelatedCacheStore<Order>>,
}

impl AppState {
    /// Creates a new AppState from existing caches.
    pub fn new(users: CacheStore<User>, orders: RelatedCacheStore<Order>) -> Self {
        Self {
            users: Arc::new(users),
            orders: Arc::new(orders),
        }
    }

    /// Creates the caches described by the Config.
    ///
    /// Caches read from the configured JSON files, or serve the demo data
    /// when no file is set. Nothing is loaded until the first refresh.
    pub fn from_config(config: &Config) -> Self {
        let users = match &config.users_file {
            Some(path) => CacheStore::new(
                "users",
                JsonFileLoader::new(path).with_debug(config.debug_loaders),
            ),
            None => CacheStore::new("users", StaticLoader::new(demo_users())),
        }
        .with_ttl(config.user_ttl);

        let orders = match &config.orders_file {
            Some(path) => RelatedCacheStore::new(
                "orders",
                JsonFileLoader::new(path).with_debug(config.debug_loaders),
                config.order_ttl,
            ),
            None => RelatedCacheStore::new(
                "orders",
                StaticLoader::new(demo_orders()),
                config.order_ttl,
            ),
        };

        Self::new(users, orders)
    }

    /// Every cache, for the refresh task.
    pub fn refreshables(&self) -> Vec<Arc<dyn Refreshable>> {
        let users: Arc<dyn Refreshable> = self.users.clone();
        let orders: Arc<dyn Refreshable> = self.orders.clone();
        vec![users, orders]
    }

    /// Refreshes every cache in turn, stopping at the first failure.
    pub fn refresh_all(&self) -> Result<Vec<RefreshedCache>> {
        self.refreshables()
            .iter()
            .map(|cache| -> Result<RefreshedCache> {
                cache.refresh()?;
                Ok(RefreshedCache {
                    name: cache.name().to_string(),
                    entries: cache.len(),
                })
            })
            .collect()
    }
}

/// Handler for GET /api/user
pub async fn get_user_handler(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<User>> {
    let id = query.id()?;
    let user = state.users.get(&id)?;
    Ok(Json(user))
}

/// Handler for GET /api/user/orders
///
/// Unknown users and expired caches both yield an empty list.
pub async fn user_orders_handler(
    State(state): State<AppState>,
    Query(query): Query<UserOrdersQuery>,
) -> Result<Json<Vec<Order>>> {
    let user_id = query.user_id()?;
    Ok(Json(state.orders.get_by_foreign_key(&user_id)))
}

/// Handler for GET /api/users/search
pub async fn search_users_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>> {
    let condition = query.condition()?;
    Ok(Json(state.users.query(&condition)))
}

/// Handler for GET /api/orders/high-value
pub async fn high_value_orders_handler(
    State(state): State<AppState>,
    Query(query): Query<HighValueQuery>,
) -> Result<Json<Vec<Order>>> {
    let min_amount = query.min_amount()?;
    let condition =
        NumberCondition::new(|o: &Order| o.amount, NumberOp::GreaterOrEqual, min_amount);
    Ok(Json(state.orders.query(&condition)))
}

/// Handler for POST /api/refresh
///
/// Runs on the blocking pool since refresh holds write locks across loader calls.
pub async fn refresh_handler(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let refreshed = tokio::task::spawn_blocking(move || state.refresh_all())
        .await
        .map_err(|err| CacheError::Internal(format!("refresh worker failed: {}", err)))??;

    Ok(Json(RefreshResponse { refreshed }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        caches: vec![
            CacheStatsEntry::new(state.users.name(), state.users.stats()),
            CacheStatsEntry::new(state.orders.name(), state.orders.stats()),
        ],
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
