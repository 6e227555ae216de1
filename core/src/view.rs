//! Stateless view models for the dashboard.
//!
//! Each struct is fully computed by the controller; nothing here reads the
//! store. `Display` renders a plain-text form that the tests and any
//! terminal front end can share.

use std::fmt;
use std::ops::Range;

use crate::store::StoreStatus;

pub const FORM_PLACEHOLDER: &str = "Add a new todo...";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load todos. Please try again later.";
const SKELETON_ROWS: usize = 3;

/// One todo row: checkbox, title, delete affordance and the per-row spinner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRowView {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub updating: bool,
}

impl TodoRowView {
    pub fn checkbox_enabled(&self) -> bool {
        !self.updating
    }
}

impl fmt::Display for TodoRowView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { 'x' } else { ' ' };
        write!(f, "[{mark}] {}  [delete]", self.title)?;
        if self.updating {
            f.write_str("  Updating...")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFormView {
    pub value: String,
    pub submitting: bool,
}

impl TodoFormView {
    pub fn submit_enabled(&self) -> bool {
        !self.submitting
    }

    pub fn button_label(&self) -> &'static str {
        if self.submitting {
            "Adding..."
        } else {
            "Add Todo"
        }
    }
}

impl fmt::Display for TodoFormView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value.is_empty() {
            FORM_PLACEHOLDER
        } else {
            self.value.as_str()
        };
        write!(f, "> {value}  [{}]", self.button_label())
    }
}

/// Pagination bar. Only built when there is more than one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: usize,
    pub total_pages: usize,
    pub first_item: usize,
    pub last_item: usize,
    pub total_items: usize,
}

impl PaginationView {
    /// `bounds` is the zero-based item range shown on `page`.
    pub fn new(
        page: usize,
        total_pages: usize,
        bounds: Range<usize>,
        total_items: usize,
    ) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }
        Some(Self {
            page,
            total_pages,
            first_item: bounds.start + 1,
            last_item: bounds.end.min(total_items),
            total_items,
        })
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} todos",
            self.first_item, self.last_item, self.total_items
        )
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

impl fmt::Display for PaginationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prev = if self.has_prev() { "[Previous]" } else { "(Previous)" };
        let next = if self.has_next() { "[Next]" } else { "(Next)" };
        write!(f, "{}  {prev} {} {next}", self.summary(), self.page_label())
    }
}

/// Confirmation modal for a pending delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDialogView {
    pub title: String,
    pub deleting: bool,
}

impl DeleteDialogView {
    pub fn message(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            self.title
        )
    }

    pub fn confirm_enabled(&self) -> bool {
        !self.deleting
    }

    pub fn confirm_label(&self) -> &'static str {
        if self.deleting {
            "Deleting..."
        } else {
            "Delete"
        }
    }
}

impl fmt::Display for DeleteDialogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Delete Todo")?;
        writeln!(f, "{}", self.message())?;
        write!(f, "[Cancel] [{}]", self.confirm_label())
    }
}

/// Every current failure, one line per source, plus the manual retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub lines: Vec<String>,
    pub refetching: bool,
}

impl ErrorBanner {
    /// `None` when no operation kind has an outstanding error.
    pub fn from_status(status: &StoreStatus) -> Option<Self> {
        let lines: Vec<String> = status.errors().map(ToString::to_string).collect();
        if lines.is_empty() {
            return None;
        }
        Some(Self {
            lines,
            refetching: status.list.in_flight,
        })
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn refetch_label(&self) -> &'static str {
        if self.refetching {
            "Refetching..."
        } else {
            "Refetch"
        }
    }
}

impl fmt::Display for ErrorBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.text())?;
        write!(f, "[{}]", self.refetch_label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyView {
    pub banner: Option<ErrorBanner>,
    pub form: TodoFormView,
    pub rows: Vec<TodoRowView>,
    pub pagination: Option<PaginationView>,
    pub dialog: Option<DeleteDialogView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    /// First load still in flight with nothing to show yet.
    Loading,
    /// The initial snapshot could not be obtained. Terminal.
    LoadFailed,
    Ready(ReadyView),
}

impl DashboardView {
    pub fn ready(&self) -> Option<&ReadyView> {
        match self {
            DashboardView::Ready(view) => Some(view),
            _ => None,
        }
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardView::Loading => {
                let rows = vec!["░".repeat(32); SKELETON_ROWS];
                f.write_str(&rows.join("\n"))
            }
            DashboardView::LoadFailed => f.write_str(LOAD_FAILED_MESSAGE),
            DashboardView::Ready(view) => {
                if let Some(banner) = &view.banner {
                    writeln!(f, "{banner}")?;
                }
                writeln!(f, "{}", view.form)?;
                for row in &view.rows {
                    writeln!(f, "{row}")?;
                }
                if let Some(pagination) = &view.pagination {
                    writeln!(f, "{pagination}")?;
                }
                if let Some(dialog) = &view.dialog {
                    writeln!(f, "{dialog}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, OperationKind, StoreError};
    use crate::store::OperationStatus;

    #[test]
    fn pagination_hidden_for_single_page() {
        assert!(PaginationView::new(1, 1, 0..10, 7).is_none());
        assert!(PaginationView::new(1, 1, 0..0, 0).is_none());
    }

    #[test]
    fn pagination_last_partial_page() {
        let view = PaginationView::new(3, 3, 20..30, 25).unwrap();
        assert_eq!(view.summary(), "Showing 21 to 25 of 25 todos");
        assert_eq!(view.page_label(), "Page 3 of 3");
        assert!(view.has_prev());
        assert!(!view.has_next());
        assert_eq!(
            view.to_string(),
            "Showing 21 to 25 of 25 todos  [Previous] Page 3 of 3 (Next)"
        );
    }

    #[test]
    fn row_marks_completion_and_spinner() {
        let row = TodoRowView {
            id: 1,
            title: "Buy milk".to_string(),
            completed: true,
            updating: true,
        };
        assert_eq!(row.to_string(), "[x] Buy milk  [delete]  Updating...");
        assert!(!row.checkbox_enabled());
    }

    #[test]
    fn form_labels_follow_submission() {
        let mut form = TodoFormView {
            value: String::new(),
            submitting: false,
        };
        assert_eq!(form.to_string(), "> Add a new todo...  [Add Todo]");
        form.submitting = true;
        assert_eq!(form.button_label(), "Adding...");
        assert!(!form.submit_enabled());
    }

    #[test]
    fn dialog_names_the_target() {
        let dialog = DeleteDialogView {
            title: "Buy milk".to_string(),
            deleting: true,
        };
        assert_eq!(
            dialog.message(),
            "Are you sure you want to delete \"Buy milk\"? This action cannot be undone."
        );
        assert_eq!(dialog.confirm_label(), "Deleting...");
        assert!(!dialog.confirm_enabled());
    }

    #[test]
    fn banner_joins_every_failing_source() {
        let failed = |kind| OperationStatus {
            in_flight: false,
            error: Some(StoreError::new(kind, &ApiError::Status(500))),
        };
        let status = StoreStatus {
            list: failed(OperationKind::Fetch),
            create: OperationStatus::default(),
            update: failed(OperationKind::Update),
            delete: failed(OperationKind::Delete),
        };
        let banner = ErrorBanner::from_status(&status).unwrap();
        assert_eq!(
            banner.text(),
            "Failed to fetch todos: request failed with status 500\n\
             Failed to update todo: request failed with status 500\n\
             Failed to delete todo: request failed with status 500"
        );
        assert_eq!(banner.refetch_label(), "Refetch");
        assert!(ErrorBanner::from_status(&StoreStatus::default()).is_none());
    }

    #[test]
    fn load_failed_is_a_single_message() {
        assert_eq!(DashboardView::LoadFailed.to_string(), LOAD_FAILED_MESSAGE);
        assert_eq!(DashboardView::Loading.to_string().lines().count(), 3);
    }
}
