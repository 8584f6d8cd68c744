//! Entity and cache contracts.

use std::fmt::Debug;
use std::hash::Hash;

use super::Condition;
use crate::error::Result;

/// An entity with a stable identifier, unique within its type.
pub trait Identifiable {
    type Id: Eq + Hash + Clone + Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

/// An entity that also references a parent through a foreign key.
pub trait ForeignKeyable: Identifiable {
    type ForeignKey: Eq + Hash + Clone + Debug + Send + Sync;

    fn foreign_key(&self) -> Self::ForeignKey;
}

/// Read and refresh operations shared by every cache.
pub trait Cache<T: Identifiable> {
    fn get(&self, id: &T::Id) -> Result<T>;
    fn get_all(&self) -> Vec<T>;
    fn query(&self, condition: &dyn Condition<T>) -> Vec<T>;
    fn refresh(&self) -> Result<()>;
    fn clear(&self);
}

/// A cache that can also be looked up by foreign key.
pub trait RelatedCache<T: ForeignKeyable>: Cache<T> {
    fn get_by_foreign_key(&self, key: &T::ForeignKey) -> Vec<T>;
}

/// Type-erased handle used to refresh caches of different entity types
/// together.
pub trait Refreshable: Send + Sync {
    fn name(&self) -> &str;
    fn refresh(&self) -> Result<()>;
    /// Entities in the current snapshot.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
