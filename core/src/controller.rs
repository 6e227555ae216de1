//! Presentation state layered over the store.
//!
//! # Design
//! `ListController` owns everything the dashboard needs besides the mirror
//! itself: the selected page, the new-title input, the delete confirmation
//! flow and which rows are waiting on a toggle. Like the store it is a
//! clonable handle, so a toggle on one row can be awaited while another row's
//! toggle is already pending. Paging is a slice over the loaded mirror and
//! never touches the network.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::StoreError;
use crate::store::TodoStore;
use crate::types::{CreateTodo, Todo, UpdateTodo};
use crate::view::{
    DashboardView, DeleteDialogView, ErrorBanner, PaginationView, ReadyView, TodoFormView,
    TodoRowView,
};

pub const PAGE_SIZE: usize = DEFAULT_PAGE_SIZE;

/// Number of pages needed for `count` items; never less than one.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Zero-based item range shown on 1-based `page`, clipped to `count`.
pub fn page_bounds(count: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_bounds(items.len(), page, page_size)]
}

/// Two-step delete confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteFlow {
    #[default]
    Idle,
    /// The modal is open for this row. A failed confirm stays here.
    ConfirmPending(Todo),
}

#[derive(Debug)]
struct ControllerState {
    current_page: usize,
    new_title: String,
    delete_flow: DeleteFlow,
    // Pending toggles per row id.
    updating: BTreeMap<u64, usize>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            current_page: 1,
            new_title: String::new(),
            delete_flow: DeleteFlow::Idle,
            updating: BTreeMap::new(),
        }
    }
}

#[derive(Clone)]
pub struct ListController {
    store: TodoStore,
    page_size: usize,
    state: Arc<Mutex<ControllerState>>,
}

impl ListController {
    pub fn new(store: TodoStore) -> Self {
        Self::with_page_size(store, PAGE_SIZE)
    }

    pub fn with_page_size(store: TodoStore, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.state.lock().await.new_title = title.into();
    }

    pub async fn title(&self) -> String {
        self.state.lock().await.new_title.clone()
    }

    /// Creates a todo from the input field. Blank input is ignored and yields
    /// `Ok(None)`; anything else is sent exactly as typed. On success the
    /// field is cleared and the first page is selected so the new, prepended
    /// row is visible.
    pub async fn submit(&self) -> Result<Option<Todo>, StoreError> {
        let title = self.title().await;
        if title.trim().is_empty() {
            return Ok(None);
        }
        match self.store.create(CreateTodo::open(title)).await {
            Ok(todo) => {
                let mut state = self.state.lock().await;
                state.new_title.clear();
                state.current_page = 1;
                Ok(Some(todo))
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to create todo");
                Err(err)
            }
        }
    }

    /// The selected page, clamped to the pages the mirror currently fills.
    pub async fn current_page(&self) -> usize {
        let pages = total_pages(self.store.item_count().await, self.page_size);
        self.state.lock().await.current_page.clamp(1, pages)
    }

    pub async fn go_to_page(&self, page: usize) -> usize {
        let pages = total_pages(self.store.item_count().await, self.page_size);
        let page = page.clamp(1, pages);
        self.state.lock().await.current_page = page;
        page
    }

    pub async fn next_page(&self) -> usize {
        let page = self.current_page().await;
        self.go_to_page(page + 1).await
    }

    pub async fn prev_page(&self) -> usize {
        let page = self.current_page().await;
        self.go_to_page(page.saturating_sub(1)).await
    }

    /// Flips `row`'s completion. The row is marked updating for exactly the
    /// lifetime of this call, whatever the outcome.
    pub async fn toggle(&self, row: &Todo) -> Result<Todo, StoreError> {
        *self
            .state
            .lock()
            .await
            .updating
            .entry(row.id)
            .or_insert(0) += 1;

        let result = self
            .store
            .update(row.id, UpdateTodo::completed(!row.completed))
            .await;

        {
            let mut state = self.state.lock().await;
            if let Some(count) = state.updating.get_mut(&row.id) {
                *count -= 1;
                if *count == 0 {
                    state.updating.remove(&row.id);
                }
            }
        }

        result.inspect_err(|err| tracing::error!(id = row.id, error = %err, "failed to update todo"))
    }

    pub async fn is_updating(&self, id: u64) -> bool {
        self.state.lock().await.updating.contains_key(&id)
    }

    pub async fn delete_flow(&self) -> DeleteFlow {
        self.state.lock().await.delete_flow.clone()
    }

    pub async fn request_delete(&self, row: &Todo) {
        self.state.lock().await.delete_flow = DeleteFlow::ConfirmPending(row.clone());
    }

    /// Closes the modal without any network call.
    pub async fn cancel_delete(&self) {
        self.state.lock().await.delete_flow = DeleteFlow::Idle;
    }

    /// Deletes the pending row. Success closes the modal; failure leaves it
    /// open so the user can retry or cancel. A no-op when nothing is pending.
    pub async fn confirm_delete(&self) -> Result<(), StoreError> {
        let target = match &self.state.lock().await.delete_flow {
            DeleteFlow::ConfirmPending(todo) => todo.id,
            DeleteFlow::Idle => return Ok(()),
        };

        match self.store.delete(target).await {
            Ok(()) => {
                let mut state = self.state.lock().await;
                // Only close the dialog that was confirmed.
                if matches!(&state.delete_flow, DeleteFlow::ConfirmPending(t) if t.id == target) {
                    state.delete_flow = DeleteFlow::Idle;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(id = target, error = %err, "failed to delete todo");
                Err(err)
            }
        }
    }

    /// Manual retry offered by the error banner.
    pub async fn refetch(&self) -> Result<usize, StoreError> {
        self.store.refetch().await
    }

    pub async fn view(&self) -> DashboardView {
        let (snapshot, status) = self.store.read_view().await;
        if snapshot.is_loading && snapshot.items.is_empty() {
            return DashboardView::Loading;
        }
        let state = self.state.lock().await;

        let count = snapshot.items.len();
        let pages = total_pages(count, self.page_size);
        let page = state.current_page.clamp(1, pages);
        let bounds = page_bounds(count, page, self.page_size);

        let rows = snapshot.items[bounds.clone()]
            .iter()
            .map(|todo| TodoRowView {
                id: todo.id,
                title: todo.title.clone(),
                completed: todo.completed,
                updating: state.updating.contains_key(&todo.id),
            })
            .collect();

        let dialog = match &state.delete_flow {
            DeleteFlow::ConfirmPending(todo) => Some(DeleteDialogView {
                title: todo.title.clone(),
                deleting: status.delete.in_flight,
            }),
            DeleteFlow::Idle => None,
        };

        DashboardView::Ready(ReadyView {
            banner: ErrorBanner::from_status(&status),
            form: TodoFormView {
                value: state.new_title.clone(),
                submitting: status.create.in_flight,
            },
            rows,
            pagination: PaginationView::new(page, pages, bounds, count),
            dialog,
        })
    }
}
