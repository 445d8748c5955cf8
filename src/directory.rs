//! Remote user directory abstraction.
//!
//! The render loop never talks HTTP directly: it asks a [`UserDirectory`] for the users
//! whose name contains a filter, and a background worker drives those lookups so the
//! event loop stays responsive while requests are in flight.

pub mod http;
pub mod worker;

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

pub use http::{HttpUserDirectory, DEFAULT_ENDPOINT};
pub use worker::fetch_worker_loop;

/// A single record from the user collection.
///
/// Only `name` is required; the remaining fields are kept when the directory sends them
/// and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Build a user carrying only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            username: None,
            email: None,
        }
    }
}

/// Decode a response body into the user schema.
///
/// The body must be a JSON array of objects with a string `name`; anything else is a
/// typed parse error.
pub fn parse_users(body: &[u8]) -> Result<Vec<User>> {
    serde_json::from_slice(body).map_err(crate::error::UserlookError::parse)
}

/// Source of user records filtered by a "name contains" query.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch every user whose name matches `filter`. An empty filter is unfiltered.
    async fn fetch_users(&self, filter: &str) -> Result<Vec<User>>;
}
