//! Table-oriented access to the hosted backend.
//!
//! A [`Store`] moves raw JSON rows; typing happens one level up in
//! [`Repository`](crate::Repository). Every operation is attempted exactly once:
//! no retry, no backoff, and failures surface directly to the caller.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::repository::entities::Table;

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to `{table}` failed: {source}")]
    Http {
        table: Table,
        #[source]
        source: reqwest::Error,
    },
    #[error("`{table}` responded with status {status}: {message}")]
    Status {
        table: Table,
        status: u16,
        message: String,
    },
    #[error("failed to encode row for `{table}`: {source}")]
    Encode {
        table: Table,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed row in `{table}`: {source}")]
    Decode {
        table: Table,
        #[source]
        source: serde_json::Error,
    },
    #[error("expected at most one row in `{table}`, found {count}")]
    MultipleRows { table: Table, count: usize },
    #[error("`{0}` is unavailable")]
    Unavailable(Table),
}

/// The four operations the application needs from the backend.
#[async_trait]
pub trait Store: Debug + Send + Sync {
    /// Every row of `table`, ascending by `order_by`.
    async fn select_ordered(&self, table: Table, order_by: &str) -> Result<Vec<Value>>;

    /// The only row of `table`, or `None` when the table is empty. More than one row is an
    /// error.
    async fn select_single(&self, table: Table) -> Result<Option<Value>>;

    /// Insert each row whose `id` is absent, replace each row whose `id` exists.
    async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<()>;

    /// Remove the row with the given `id`. Removing a missing row is not an error.
    async fn delete(&self, table: Table, id: Uuid) -> Result<()>;
}

/// Bearer token shared between the authentication collaborator and the store, so that
/// writes made after signing in carry the session's access token.
#[derive(Debug, Clone, Default)]
pub struct TokenCell {
    token: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    pub fn set(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().clone()
    }
}
