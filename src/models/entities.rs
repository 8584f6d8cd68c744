//! Demo entities served by the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{ForeignKeyable, Identifiable};

/// A user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl Identifiable for User {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

/// An order placed by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub user_id: u64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order stamped with the current time.
    pub fn new(id: u64, user_id: u64, amount: f64) -> Self {
        Self {
            id,
            user_id,
            amount,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Order {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl ForeignKeyable for Order {
    type ForeignKey = u64;

    fn foreign_key(&self) -> u64 {
        self.user_id
    }
}

/// Users and orders served when no data files are configured.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
        },
        User {
            id: 2,
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
        },
    ]
}

pub fn demo_orders() -> Vec<Order> {
    vec![
        Order::new(1, 1, 100.0),
        Order::new(2, 1, 200.0),
        Order::new(3, 2, 300.0),
    ]
}
