//! Client-side cache and list logic for a todo dashboard.
//!
//! # Overview
//! A `TodoStore` keeps an in-memory mirror of a remote `/todos` collection
//! in step with create, update, delete and refetch calls. A
//! `ListController` derives paging, the delete confirmation flow and
//! per-row progress from it, and renders `view` models for display.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces a request, `parse_*`
//!   consumes a response. A `Transport` performs the I/O in between.
//! - The store is the single writer of the mirror and is handed to
//!   consumers explicitly; there is no global instance.
//! - Every store operation returns a `Result`, with failures tagged by the
//!   operation kind that produced them.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod store;
pub mod transport;
pub mod types;
pub mod view;

pub use bootstrap::{fetch_snapshot, Dashboard};
pub use client::TodoClient;
pub use config::DashboardConfig;
pub use controller::{page_bounds, page_slice, total_pages, DeleteFlow, ListController, PAGE_SIZE};
pub use error::{ApiError, OperationKind, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{ListSnapshot, OperationStatus, StoreStatus, TodoStore};
pub use transport::{Transport, UreqTransport};
pub use types::{CreateTodo, Todo, UpdateTodo, DEFAULT_USER_ID};
pub use view::DashboardView;
