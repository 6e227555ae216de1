//! In-memory stand-in for the remote `/todos` collection.
//!
//! Mirrors the jsonplaceholder contract the dashboard is written against:
//! integer ids assigned by the server, `userId` on every record, partial
//! updates over PATCH and a `200 {}` reply to DELETE.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub user_id: u64,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "userId", default = "default_user_id")]
    pub user_id: u64,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

fn default_user_id() -> u64 {
    1
}

/// Records keyed by id so listing comes back in ascending id order.
#[derive(Debug)]
pub struct Collection {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

impl Collection {
    fn with_todos(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            todos: todos.into_iter().map(|t| (t.id, t)).collect(),
            next_id,
        }
    }
}

pub type Db = Arc<RwLock<Collection>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router pre-populated with `todos`; new ids continue after the largest one.
pub fn app_with(todos: Vec<Todo>) -> Router {
    let db: Db = Arc::new(RwLock::new(Collection::with_todos(todos)));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).patch(update_todo).delete(delete_todo),
        )
        .with_state(db)
}

/// `n` deterministic records with ids `1..=n`, every third one completed.
pub fn sample_todos(n: u64) -> Vec<Todo> {
    (1..=n)
        .map(|id| Todo {
            id,
            title: format!("Sample todo {id}"),
            completed: id % 3 == 0,
            user_id: 1 + (id - 1) / 20,
        })
        .collect()
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let db = db.read().await;
    Json(db.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let mut db = db.write().await;
    let todo = Todo {
        id: db.next_id,
        title: input.title,
        completed: input.completed,
        user_id: input.user_id,
    };
    db.next_id += 1;
    db.todos.insert(todo.id, todo.clone());
    tracing::debug!(id = todo.id, "created todo");
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Todo>, StatusCode> {
    let db = db.read().await;
    db.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut db = db.write().await;
    let todo = db.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    tracing::debug!(id, "updated todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut db = db.write().await;
    db.todos
        .remove(&id)
        .map(|_| Json(serde_json::json!({})))
        .ok_or(StatusCode::NOT_FOUND)
}
