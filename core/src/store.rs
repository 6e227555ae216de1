//! The session's authoritative copy of the remote todo collection.
//!
//! # Design
//! `TodoStore` is a clonable handle around one shared state cell. It is the
//! only writer of the mirror: every mutation happens after a response has
//! been parsed, and each one touches only the entries it targets (prepend,
//! replace-by-id, remove-by-id, or full replace on refetch). The lock is
//! never held across a network await, so any number of calls of any kind
//! may be in flight at once; the server is trusted to order conflicting
//! writes and the last response to arrive wins locally.
//!
//! Every operation kind keeps its own in-flight counter and last error.
//! Starting an attempt clears that kind's error. When attempts of one kind
//! overlap, only the most recently started attempt that has settled decides
//! the error: an older response arriving late still updates the mirror but
//! never overwrites the outcome of a newer attempt. Other kinds are never
//! touched.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::TodoClient;
use crate::error::{ApiError, OperationKind, StoreError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Progress of one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStatus {
    pub in_flight: bool,
    pub error: Option<StoreError>,
}

/// Progress of all four operation kinds at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    pub list: OperationStatus,
    pub create: OperationStatus,
    pub update: OperationStatus,
    pub delete: OperationStatus,
}

impl StoreStatus {
    /// Last errors in banner order: fetch, create, update, delete.
    pub fn errors(&self) -> impl Iterator<Item = &StoreError> {
        [&self.list, &self.create, &self.update, &self.delete]
            .into_iter()
            .filter_map(|op| op.error.as_ref())
    }
}

/// Read view of the mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
    pub items: Vec<Todo>,
    pub is_loading: bool,
    pub error: Option<StoreError>,
}

#[derive(Debug, Default)]
struct Slot {
    in_flight: usize,
    error: Option<StoreError>,
    /// Ticket handed to the latest attempt.
    started: u64,
    /// Ticket of the newest attempt whose outcome is reflected in `error`.
    settled: u64,
}

impl Slot {
    fn status(&self) -> OperationStatus {
        OperationStatus {
            in_flight: self.in_flight > 0,
            error: self.error.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    items: Vec<Todo>,
    list: Slot,
    create: Slot,
    update: Slot,
    delete: Slot,
}

impl State {
    fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.items.clone(),
            is_loading: self.list.in_flight > 0,
            error: self.list.error.clone(),
        }
    }

    fn status(&self) -> StoreStatus {
        StoreStatus {
            list: self.list.status(),
            create: self.create.status(),
            update: self.update.status(),
            delete: self.delete.status(),
        }
    }

    fn slot_mut(&mut self, kind: OperationKind) -> &mut Slot {
        match kind {
            OperationKind::Fetch => &mut self.list,
            OperationKind::Create => &mut self.create,
            OperationKind::Update => &mut self.update,
            OperationKind::Delete => &mut self.delete,
        }
    }
}

struct Inner {
    client: TodoClient,
    transport: Arc<dyn Transport>,
    state: RwLock<State>,
}

/// Handle to the mirror. Clones share the same state.
#[derive(Clone)]
pub struct TodoStore {
    inner: Arc<Inner>,
}

impl TodoStore {
    /// An empty, not yet loaded store. Call [`refetch`](Self::refetch) to
    /// populate it.
    pub fn new(client: TodoClient, transport: Arc<dyn Transport>) -> Self {
        Self::seeded(client, transport, Vec::new())
    }

    /// A store whose mirror starts from `todos`, typically the initial
    /// snapshot.
    pub fn seeded(client: TodoClient, transport: Arc<dyn Transport>, todos: Vec<Todo>) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                transport,
                state: RwLock::new(State {
                    items: todos,
                    ..State::default()
                }),
            }),
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.inner.client
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        self.inner.state.read().await.snapshot()
    }

    pub async fn item_count(&self) -> usize {
        self.inner.state.read().await.items.len()
    }

    pub async fn status(&self) -> StoreStatus {
        self.inner.state.read().await.status()
    }

    /// Mirror and operation status taken under one read, so both describe
    /// the same instant.
    pub async fn read_view(&self) -> (ListSnapshot, StoreStatus) {
        let state = self.inner.state.read().await;
        (state.snapshot(), state.status())
    }

    /// Re-reads the whole collection. On success the mirror is replaced and
    /// the number of items is returned; on failure the mirror is untouched.
    pub async fn refetch(&self) -> Result<usize, StoreError> {
        let ticket = self.begin(OperationKind::Fetch).await;
        let client = self.client();
        let outcome = self
            .exchange(Ok(client.build_list_todos()), |c, r| c.parse_list_todos(r))
            .await;
        self.finish(OperationKind::Fetch, ticket, outcome, |items, todos| {
            let count = todos.len();
            *items = todos;
            tracing::info!(count, "replaced todo mirror");
            count
        })
        .await
    }

    /// Creates a todo and prepends the server's representation.
    pub async fn create(&self, input: CreateTodo) -> Result<Todo, StoreError> {
        let ticket = self.begin(OperationKind::Create).await;
        let client = self.client();
        let outcome = self
            .exchange(client.build_create_todo(&input), |c, r| c.parse_create_todo(r))
            .await;
        self.finish(OperationKind::Create, ticket, outcome, |items, todo| {
            items.insert(0, todo.clone());
            todo
        })
        .await
    }

    /// Applies a partial update and swaps the matching entry for the
    /// server's representation. Fields are not merged.
    pub async fn update(&self, id: u64, input: UpdateTodo) -> Result<Todo, StoreError> {
        let ticket = self.begin(OperationKind::Update).await;
        let client = self.client();
        let outcome = self
            .exchange(client.build_update_todo(id, &input), |c, r| c.parse_update_todo(r))
            .await;
        self.finish(OperationKind::Update, ticket, outcome, |items, todo| {
            if let Some(entry) = items.iter_mut().find(|t| t.id == todo.id) {
                *entry = todo.clone();
            }
            todo
        })
        .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), StoreError> {
        let ticket = self.begin(OperationKind::Delete).await;
        let client = self.client();
        let outcome = self
            .exchange(Ok(client.build_delete_todo(id)), |c, r| c.parse_delete_todo(r))
            .await;
        self.finish(OperationKind::Delete, ticket, outcome, |items, ()| {
            items.retain(|t| t.id != id);
        })
        .await
    }

    async fn begin(&self, kind: OperationKind) -> u64 {
        let mut state = self.inner.state.write().await;
        let slot = state.slot_mut(kind);
        slot.in_flight += 1;
        slot.started += 1;
        slot.error = None;
        slot.started
    }

    async fn exchange<T>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let request = request?;
        tracing::debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.inner.transport.execute(request).await?;
        tracing::debug!(status = response.status, "received response");
        parse(&self.inner.client, response)
    }

    async fn finish<T, R>(
        &self,
        kind: OperationKind,
        ticket: u64,
        outcome: Result<T, ApiError>,
        apply: impl FnOnce(&mut Vec<Todo>, T) -> R,
    ) -> Result<R, StoreError> {
        let mut state = self.inner.state.write().await;
        let slot = state.slot_mut(kind);
        slot.in_flight = slot.in_flight.saturating_sub(1);
        let latest = ticket > slot.settled;
        if latest {
            slot.settled = ticket;
        }
        let result = match outcome {
            Ok(value) => {
                if latest {
                    slot.error = None;
                }
                Ok(value)
            }
            Err(source) => {
                let err = StoreError::new(kind, &source);
                tracing::warn!(operation = %kind, error = %source, "todo operation failed");
                if latest {
                    slot.error = Some(err.clone());
                } else {
                    tracing::debug!(operation = %kind, ticket, "stale failure superseded by a newer attempt");
                }
                Err(err)
            }
        };
        result.map(|value| apply(&mut state.items, value))
    }
}
