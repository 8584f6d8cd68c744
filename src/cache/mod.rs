//! Cache Module
//!
//! Snapshot caches with TTL expiration, a foreign-key index and composable
//! query conditions.

mod clock;
pub mod condition;
mod freshness;
mod related;
mod stats;
mod store;
mod traits;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use condition::{
    CompositeCondition, Condition, ConditionExt, LogicalOp, Number, NumberCondition, NumberOp,
    StringCondition, StringOp,
};
pub use freshness::Freshness;
pub use related::RelatedCacheStore;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use traits::{Cache, ForeignKeyable, Identifiable, RelatedCache, Refreshable};
