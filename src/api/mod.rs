//! API Module
//!
//! HTTP handlers and routing for the read-only cache API.
//!
//! # Endpoints
//! - `GET /api/user?id=` - User by id
//! - `GET /api/user/orders?user_id=` - Orders of a user
//! - `GET /api/users/search?name=&op=` - Users filtered by name
//! - `GET /api/orders/high-value?min_amount=` - Orders at or above an amount
//! - `POST /api/refresh` - Reload every cache from its loader
//! - `GET /stats` - Per-cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
