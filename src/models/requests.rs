//! Request DTOs for the cache API
//!
//! Query-string parameters, kept as raw strings so that a missing value and a
//! malformed one produce different error messages.

use std::str::FromStr;

use serde::Deserialize;

use crate::cache::{StringCondition, StringOp};
use crate::error::{CacheError, Result};
use crate::models::User;

fn required<T: FromStr>(name: &str, value: Option<&str>) -> Result<T> {
    let raw = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CacheError::InvalidQuery(format!("missing {} parameter", name)))?;
    raw.parse()
        .map_err(|_| CacheError::InvalidQuery(format!("invalid {} parameter", name)))
}

/// Query for `GET /api/user`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub id: Option<String>,
}

impl UserQuery {
    pub fn id(&self) -> Result<u64> {
        required("id", self.id.as_deref())
    }
}

/// Query for `GET /api/user/orders`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserOrdersQuery {
    pub user_id: Option<String>,
}

impl UserOrdersQuery {
    pub fn user_id(&self) -> Result<u64> {
        required("user_id", self.user_id.as_deref())
    }
}

/// Query for `GET /api/users/search`
///
/// `op` defaults to `contains`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub op: Option<String>,
}

impl SearchQuery {
    pub fn condition(&self) -> Result<StringCondition<User>> {
        let name: String = required("name", self.name.as_deref())?;
        let op = match self.op.as_deref() {
            None => StringOp::Contains,
            Some(op) => StringOp::from_name(op)
                .ok_or_else(|| CacheError::InvalidQuery(format!("unknown operation '{}'", op)))?,
        };
        Ok(StringCondition::new(|u: &User| u.name.as_str(), op, name))
    }
}

/// Query for `GET /api/orders/high-value`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HighValueQuery {
    pub min_amount: Option<String>,
}

impl HighValueQuery {
    pub fn min_amount(&self) -> Result<f64> {
        required("min_amount", self.min_amount.as_deref())
    }
}
