//! In-memory transports shared by the store and controller tests.
//!
//! `FakeApi` answers immediately with jsonplaceholder-like semantics and can
//! be told to fail per method. `gated()` hands every request to the test,
//! which replies whenever (and in whatever order) it likes.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use todo_dashboard::{
    ApiError, CreateTodo, HttpMethod, HttpRequest, HttpResponse, ListController, Todo, TodoClient,
    TodoStore, Transport, UpdateTodo,
};

pub const BASE_URL: &str = "http://api.test";

pub fn todo(id: u64, title: &str) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        completed: false,
        user_id: 1,
    }
}

/// `n` todos with ids `1..=n`, titled `Todo {id}`.
pub fn todos(n: u64) -> Vec<Todo> {
    (1..=n).map(|id| todo(id, &format!("Todo {id}"))).collect()
}

pub fn ids(items: &[Todo]) -> Vec<u64> {
    items.iter().map(|t| t.id).collect()
}

pub fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

// ---------------------------------------------------------------------------
// FakeApi
// ---------------------------------------------------------------------------

struct FakeState {
    todos: Vec<Todo>,
    next_id: u64,
    failing: HashSet<HttpMethod>,
    disconnected: bool,
    requests: Vec<HttpRequest>,
}

pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_todos(todos: Vec<Todo>) -> Arc<Self> {
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            state: Mutex::new(FakeState {
                todos,
                next_id,
                failing: HashSet::new(),
                disconnected: false,
                requests: Vec::new(),
            }),
        })
    }

    /// Answer every `method` request with a 500 until `recover`.
    pub fn fail(&self, method: HttpMethod) {
        self.state.lock().unwrap().failing.insert(method);
    }

    pub fn recover(&self, method: HttpMethod) {
        self.state.lock().unwrap().failing.remove(&method);
    }

    /// Every request fails before reaching the server.
    pub fn disconnect(&self) {
        self.state.lock().unwrap().disconnected = true;
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn server_todos(&self) -> Vec<Todo> {
        self.state.lock().unwrap().todos.clone()
    }

    pub fn store(self: &Arc<Self>, seed: Vec<Todo>) -> TodoStore {
        TodoStore::seeded(client(), self.clone(), seed)
    }

    /// Store and controller seeded with whatever the server currently holds.
    pub fn controller(self: &Arc<Self>) -> ListController {
        ListController::new(self.store(self.server_todos()))
    }

    fn respond(&self, request: HttpRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if state.failing.contains(&request.method) {
            return HttpResponse::new(500, "boom");
        }

        let rest = request
            .path
            .strip_prefix(BASE_URL)
            .and_then(|p| p.strip_prefix("/todos"))
            .unwrap_or_default();
        let id: Option<u64> = rest.strip_prefix('/').and_then(|s| s.parse().ok());

        match (request.method, id) {
            (HttpMethod::Get, None) => json(200, &state.todos),
            (HttpMethod::Post, None) => {
                let input: CreateTodo =
                    serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                let created = Todo {
                    id: state.next_id,
                    title: input.title,
                    completed: input.completed,
                    user_id: input.user_id,
                };
                state.next_id += 1;
                state.todos.push(created.clone());
                json(201, &created)
            }
            (HttpMethod::Patch, Some(id)) => {
                let input: UpdateTodo =
                    serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                match state.todos.iter_mut().find(|t| t.id == id) {
                    Some(todo) => {
                        if let Some(title) = input.title {
                            todo.title = title;
                        }
                        if let Some(completed) = input.completed {
                            todo.completed = completed;
                        }
                        let todo = todo.clone();
                        json(200, &todo)
                    }
                    None => HttpResponse::new(404, "{}"),
                }
            }
            (HttpMethod::Delete, Some(id)) => {
                let before = state.todos.len();
                state.todos.retain(|t| t.id != id);
                if state.todos.len() == before {
                    HttpResponse::new(404, "{}")
                } else {
                    HttpResponse::new(200, "{}")
                }
            }
            _ => HttpResponse::new(404, "{}"),
        }
    }
}

fn json<T: serde::Serialize>(status: u16, value: &T) -> HttpResponse {
    HttpResponse::new(status, serde_json::to_string(value).unwrap())
}

#[async_trait]
impl Transport for FakeApi {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if self.state.lock().unwrap().disconnected {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(self.respond(request))
    }
}

// ---------------------------------------------------------------------------
// Gated transport
// ---------------------------------------------------------------------------

/// A request parked until the test answers it.
pub struct Pending {
    pub request: HttpRequest,
    reply: oneshot::Sender<HttpResponse>,
}

impl Pending {
    pub fn respond(self, status: u16, body: impl Into<String>) {
        let _ = self.reply.send(HttpResponse::new(status, body));
    }

    pub fn respond_todo(self, todo: &Todo) {
        self.respond(200, serde_json::to_string(todo).unwrap());
    }
}

pub struct GatedTransport {
    tx: mpsc::UnboundedSender<Pending>,
}

#[async_trait]
impl Transport for GatedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Pending { request, reply })
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        rx.await
            .map_err(|_| ApiError::Transport("reply dropped".to_string()))
    }
}

pub fn gated() -> (Arc<GatedTransport>, mpsc::UnboundedReceiver<Pending>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(GatedTransport { tx }), rx)
}

pub fn gated_store(seed: Vec<Todo>) -> (TodoStore, mpsc::UnboundedReceiver<Pending>) {
    let (transport, rx) = gated();
    (TodoStore::seeded(client(), transport, seed), rx)
}
