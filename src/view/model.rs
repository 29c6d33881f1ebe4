//! View model: everything the presentation layer reads, computed from a
//! `CollectionView` in one pass.

use crate::error::ErrorKind;
use crate::query::{Filters, SortSpec};
use crate::source::CollectionStats;
use crate::types::Item;

use super::{CollectionView, ConfirmationState, FetchStatus, LoadMode, TagUsage, Toast, ViewError};

// ============================================================================
// View Model Types
// ============================================================================

/// What the list area should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    /// First load of the descriptor has not settled.
    Loading,
    Ready,
    /// Loaded, nothing to show.
    Empty,
    /// The last load failed; the user can retry.
    Failed,
}

#[derive(Debug, Clone)]
pub struct ViewModel {
    /// Items to render, after client-side filtering and sorting
    pub items: Vec<Item>,
    pub list_state: ListState,
    /// Whether any fetch is outstanding
    pub is_loading: bool,
    pub error: Option<ViewError>,
    pub notice: Option<Toast>,
    pub pagination: PaginationViewModel,
    pub filters: Filters,
    pub sort: Option<SortSpec>,
    /// Facets derived from the loaded window
    pub tags: Vec<TagUsage>,
    /// Tag counts cover only loaded items
    pub tags_windowed: bool,
    pub confirmation: ConfirmationState,
    /// Prompt for a pending or committing delete
    pub confirmation_message: Option<String>,
    pub stats: Option<CollectionStats>,
    /// Text for an empty list
    pub empty_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationViewModel {
    pub mode: LoadMode,
    /// Current page, `None` when scrolling
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub total_pages: usize,
    pub page_numbers: Vec<usize>,
    pub total_count: usize,
    pub loaded_count: Option<usize>,
    pub has_more: bool,
    /// 1-based inclusive, `(0, 0)` when empty
    pub range: (usize, usize),
}

impl PaginationViewModel {
    /// "Showing A to B of N entries"
    pub fn range_text(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.range.0, self.range.1, self.total_count
        )
    }

    pub fn has_previous(&self) -> bool {
        self.page.is_some_and(|p| p > 1)
    }

    pub fn has_next(&self) -> bool {
        self.page.is_some_and(|p| p < self.total_pages)
    }
}

impl ViewModel {
    pub fn is_failed(&self) -> bool {
        self.list_state == ListState::Failed
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Compute the view model for the current engine state.
pub fn compute_view_model(view: &CollectionView) -> ViewModel {
    let items = view.visible_items();
    let pagination = view.pagination();
    let config = view.config();

    let list_state = match view.fetch_status() {
        FetchStatus::Failed => ListState::Failed,
        FetchStatus::Pending => ListState::Loading,
        FetchStatus::Loaded if items.is_empty() => ListState::Empty,
        FetchStatus::Loaded => ListState::Ready,
    };

    let confirmation = view.confirmation();
    let confirmation_message = confirmation.target().and_then(|id| {
        let label = view
            .find_item(id)
            .map(Item::label)
            .unwrap_or_else(|| format!("#{id}"));
        confirmation.message(&label)
    });

    ViewModel {
        items,
        list_state,
        is_loading: view.is_loading(),
        error: view.error().cloned(),
        notice: view.toast().cloned(),
        pagination: PaginationViewModel {
            mode: pagination.mode(),
            page: pagination.page(),
            page_size: pagination.page_size(),
            total_pages: pagination.total_pages(),
            page_numbers: pagination.page_numbers(config.max_page_links),
            total_count: pagination.total_count(),
            loaded_count: pagination.loaded_count(),
            has_more: pagination.has_more(),
            range: pagination.visible_range(),
        },
        filters: view.filters().clone(),
        sort: view.sort().cloned(),
        tags: view.tags().entries().to_vec(),
        tags_windowed: view.tags().is_windowed(),
        confirmation,
        confirmation_message,
        stats: view.stats().cloned(),
        empty_text: config.empty_text.clone(),
    }
}

/// Shareable path for an item: `<prefix>/<url_title>`, falling back to the id.
pub fn share_path(prefix: &str, item: &Item) -> String {
    let prefix = prefix.trim_end_matches('/');
    match item.text("url_title").map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => format!("{prefix}/{slug}"),
        None => format!("{prefix}/{}", item.id),
    }
}
