//! Error types for the todo client and the store built on it.
//!
//! # Design
//! `ApiError` describes what went wrong with one HTTP exchange. The store
//! folds every `ApiError` into a `StoreError` tagged with the operation kind
//! that failed, which is all the dashboard needs to render its banner.

use std::fmt;

use thiserror::Error;

/// Errors returned by the client parse methods and by transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server returned 404; the requested todo does not exist.
    #[error("request failed: resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404. The body is not
    /// inspected.
    #[error("request failed with status {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// The four independently tracked store operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fetch,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    /// Banner prefix used when this kind of operation fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            OperationKind::Fetch => "Failed to fetch todos",
            OperationKind::Create => "Failed to create todo",
            OperationKind::Update => "Failed to update todo",
            OperationKind::Delete => "Failed to delete todo",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Fetch => "fetch",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A failed store operation: which kind, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .kind.failure_prefix())]
pub struct StoreError {
    pub kind: OperationKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: OperationKind, source: &ApiError) -> Self {
        Self {
            kind,
            message: source.to_string(),
        }
    }
}
