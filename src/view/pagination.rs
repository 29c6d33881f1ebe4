//! Paged and infinite-scroll pagination.
//!
//! Both strategies turn the active descriptor into fetch windows and track
//! how much of the collection is loaded. `total_count` only ever comes from
//! a source response.

use serde::{Deserialize, Serialize};

use crate::config::ViewConfig;
use crate::enum_display_fromstr;
use crate::error::{FolioError, Result};
use crate::query::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    #[default]
    Paged,
    InfiniteScroll,
}

enum_display_fromstr!(
    LoadMode,
    FolioError::InvalidMode,
    {
        Paged => "paged",
        InfiniteScroll => "infinite_scroll",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    /// `page` is 1-based.
    Paged { page: usize, page_size: usize },
    /// `loaded_count` counts items actually accumulated, so it is 0 until the
    /// first batch of a descriptor settles.
    InfiniteScroll {
        loaded_count: usize,
        initial_batch: usize,
        batch_size: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Pagination {
    state: PaginationState,
    total_count: usize,
    page_size_choices: Vec<usize>,
}

impl Pagination {
    pub fn from_config(config: &ViewConfig) -> Self {
        let state = match config.mode {
            LoadMode::Paged => PaginationState::Paged {
                page: 1,
                page_size: config.page_size,
            },
            LoadMode::InfiniteScroll => PaginationState::InfiniteScroll {
                loaded_count: 0,
                initial_batch: config.initial_batch,
                batch_size: config.batch_size,
            },
        };
        Self {
            state,
            total_count: 0,
            page_size_choices: config.page_size_choices.clone(),
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn mode(&self) -> LoadMode {
        match self.state {
            PaginationState::Paged { .. } => LoadMode::Paged,
            PaginationState::InfiniteScroll { .. } => LoadMode::InfiniteScroll,
        }
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn page(&self) -> Option<usize> {
        match self.state {
            PaginationState::Paged { page, .. } => Some(page),
            PaginationState::InfiniteScroll { .. } => None,
        }
    }

    pub fn loaded_count(&self) -> Option<usize> {
        match self.state {
            PaginationState::Paged { .. } => None,
            PaginationState::InfiniteScroll { loaded_count, .. } => Some(loaded_count),
        }
    }

    /// Back to page 1, or to an empty accumulation awaiting the initial batch.
    pub fn reset(&mut self) {
        match &mut self.state {
            PaginationState::Paged { page, .. } => *page = 1,
            PaginationState::InfiniteScroll { loaded_count, .. } => *loaded_count = 0,
        }
    }

    /// Window identifying the current descriptor.
    ///
    /// In infinite-scroll mode this is always the initial batch; later
    /// batches continue the same descriptor.
    pub fn current_window(&self) -> Window {
        match self.state {
            PaginationState::Paged { page, page_size } => Window::for_page(page, page_size),
            PaginationState::InfiniteScroll { initial_batch, .. } => {
                Window::new(0, initial_batch)
            }
        }
    }

    /// Window that reloads everything currently shown.
    pub fn refresh_window(&self) -> Window {
        match self.state {
            PaginationState::Paged { .. } => self.current_window(),
            PaginationState::InfiniteScroll {
                loaded_count,
                initial_batch,
                ..
            } => Window::new(0, loaded_count.max(initial_batch)),
        }
    }

    pub fn total_pages(&self) -> usize {
        match self.state {
            PaginationState::Paged { page_size, .. } => self.total_count.div_ceil(page_size),
            PaginationState::InfiniteScroll { .. } => usize::from(self.total_count > 0),
        }
    }

    /// Window for page `n`, or `None` when `n` is outside `[1, total_pages]`.
    pub fn page_window(&self, n: usize) -> Option<Window> {
        match self.state {
            PaginationState::Paged { page_size, .. } if n >= 1 && n <= self.total_pages() => {
                Some(Window::for_page(n, page_size))
            }
            _ => None,
        }
    }

    pub fn set_page(&mut self, n: usize) {
        if let PaginationState::Paged { page, .. } = &mut self.state {
            *page = n.max(1);
        }
    }

    /// Window of the next batch, if anything remains to load.
    pub fn next_batch_window(&self) -> Option<Window> {
        match self.state {
            PaginationState::InfiniteScroll {
                loaded_count,
                batch_size,
                ..
            } if loaded_count < self.total_count => Some(Window::new(loaded_count, batch_size)),
            _ => None,
        }
    }

    /// Switch page size. Returns whether anything changed; a change resets to
    /// page 1.
    pub fn set_page_size(&mut self, size: usize) -> Result<bool> {
        if !self.page_size_choices.contains(&size) {
            return Err(FolioError::InvalidPageSize(size));
        }
        match &mut self.state {
            PaginationState::Paged { page, page_size } if *page_size != size => {
                *page_size = size;
                *page = 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn page_size(&self) -> Option<usize> {
        match self.state {
            PaginationState::Paged { page_size, .. } => Some(page_size),
            PaginationState::InfiniteScroll { .. } => None,
        }
    }

    /// Record a window that replaced the loaded items.
    pub fn record_replace(&mut self, received: usize, total_count: usize) {
        self.total_count = total_count;
        if let PaginationState::InfiniteScroll { loaded_count, .. } = &mut self.state {
            *loaded_count = received.min(total_count);
        }
    }

    /// Record a batch of `fresh` new items appended to the loaded items.
    pub fn record_append(&mut self, fresh: usize, total_count: usize) {
        self.total_count = total_count;
        if let PaginationState::InfiniteScroll { loaded_count, .. } = &mut self.state {
            *loaded_count = (*loaded_count + fresh).min(total_count);
        }
    }

    pub fn has_more(&self) -> bool {
        match self.state {
            PaginationState::Paged { page, .. } => page < self.total_pages(),
            PaginationState::InfiniteScroll { loaded_count, .. } => loaded_count < self.total_count,
        }
    }

    /// 1-based inclusive range of visible entries, `(0, 0)` when empty.
    pub fn visible_range(&self) -> (usize, usize) {
        if self.total_count == 0 {
            return (0, 0);
        }
        match self.state {
            PaginationState::Paged { page, page_size } => {
                let skip = (page - 1) * page_size;
                if skip >= self.total_count {
                    return (0, 0);
                }
                (skip + 1, (skip + page_size).min(self.total_count))
            }
            PaginationState::InfiniteScroll { loaded_count, .. } if loaded_count > 0 => {
                (1, loaded_count)
            }
            PaginationState::InfiniteScroll { .. } => (0, 0),
        }
    }

    /// Up to `max_links` page numbers centred on the current page.
    pub fn page_numbers(&self, max_links: usize) -> Vec<usize> {
        let PaginationState::Paged { page, .. } = self.state else {
            return Vec::new();
        };
        let total = self.total_pages();
        let count = max_links.min(total);
        if count == 0 {
            return Vec::new();
        }
        let latest_start = total - count + 1;
        let start = page.saturating_sub(count / 2).clamp(1, latest_start);
        (start..start + count).collect()
    }
}
