//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Refresh: reloads every cache from its loader at a fixed interval

mod refresh;

pub use refresh::spawn_refresh_task;
