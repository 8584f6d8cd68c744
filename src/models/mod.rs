//! Models
//!
//! Demo entities plus the DTOs used for HTTP query strings and response bodies.

pub mod entities;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use entities::{demo_orders, demo_users, Order, User};
pub use requests::{HighValueQuery, SearchQuery, UserOrdersQuery, UserQuery};
pub use responses::{
    CacheStatsEntry, ErrorResponse, HealthResponse, RefreshResponse, RefreshedCache,
    StatsResponse,
};
