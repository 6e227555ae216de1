//! Domain DTOs for the remote todo collection.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the integration tests catch any drift between the two crates. Field names
//! follow Rust conventions and are mapped to the wire's camel case by serde.

use serde::{Deserialize, Serialize};

/// Owner assigned to todos created from the dashboard form.
pub const DEFAULT_USER_ID: u64 = 1;

/// A single todo item returned by the API. `id` is server-assigned and never
/// changes once the item exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

/// Request payload for creating a new todo. Carries no `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

impl CreateTodo {
    /// An open todo owned by [`DEFAULT_USER_ID`].
    pub fn open(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
            user_id: DEFAULT_USER_ID,
        }
    }
}

/// Partial update. Only the fields present in the JSON are applied; omitted
/// fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTodo {
    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}
