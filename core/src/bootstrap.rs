//! One-shot initial load that seeds the store before the first render.

use std::sync::Arc;

use crate::client::TodoClient;
use crate::config::DashboardConfig;
use crate::controller::ListController;
use crate::error::{ApiError, OperationKind, StoreError};
use crate::store::TodoStore;
use crate::transport::Transport;
use crate::types::Todo;
use crate::view::DashboardView;

/// Fetches the starting snapshot with a single `GET /todos`.
pub async fn fetch_snapshot(
    client: &TodoClient,
    transport: &dyn Transport,
) -> Result<Vec<Todo>, StoreError> {
    let failed = |e: ApiError| StoreError::new(OperationKind::Fetch, &e);
    let response = transport
        .execute(client.build_list_todos())
        .await
        .map_err(failed)?;
    client.parse_list_todos(response).map_err(failed)
}

/// The application root: either a live controller over a seeded store, or
/// the terminal failure state when no snapshot could be obtained.
pub enum Dashboard {
    Ready(ListController),
    Failed(StoreError),
}

impl Dashboard {
    /// Builds the store and controller once; consumers receive the
    /// controller (and through it the store) explicitly.
    pub async fn open(config: &DashboardConfig, transport: Arc<dyn Transport>) -> Self {
        let client = TodoClient::new(&config.base_url);
        match fetch_snapshot(&client, transport.as_ref()).await {
            Ok(todos) => {
                tracing::info!(count = todos.len(), base_url = client.base_url(), "loaded initial todos");
                let store = TodoStore::seeded(client, transport, todos);
                Dashboard::Ready(ListController::with_page_size(store, config.page_size))
            }
            Err(err) => {
                tracing::error!(error = %err, "initial todo load failed");
                Dashboard::Failed(err)
            }
        }
    }

    pub fn controller(&self) -> Option<&ListController> {
        match self {
            Dashboard::Ready(controller) => Some(controller),
            Dashboard::Failed(_) => None,
        }
    }

    pub async fn view(&self) -> DashboardView {
        match self {
            Dashboard::Ready(controller) => controller.view().await,
            Dashboard::Failed(_) => DashboardView::LoadFailed,
        }
    }
}
