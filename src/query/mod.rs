//! Query descriptors: the immutable description of what to fetch.
//!
//! Every change to filters, sort or window produces a new `QueryDescriptor`
//! under a new `Generation`. Fetch results are tagged with the generation that
//! issued them so late answers for an older descriptor can be dropped.

use serde::{Deserialize, Serialize};

use crate::types::{ItemStatus, TagId};

pub mod filter;
pub mod sort;

pub use filter::{FilterMode, ItemPredicate, SearchMatch, filter_items};
pub use sort::{SortDirection, SortMode, SortSpec, compare_items, sort_items};

/// Monotonic token identifying the descriptor a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Active facets. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tag.is_none() && self.search.is_none()
    }

    pub fn with_status(mut self, status: Option<ItemStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_tag(mut self, tag: Option<TagId>) -> Self {
        self.tag = tag;
        self
    }

    /// Blank or whitespace-only text clears the search facet.
    pub fn with_search(mut self, text: impl AsRef<str>) -> Self {
        self.search = normalize_search(text.as_ref());
        self
    }
}

pub fn normalize_search(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Offset and count of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Window {
    pub skip: usize,
    pub take: usize,
}

impl Window {
    pub fn new(skip: usize, take: usize) -> Self {
        Self { skip, take }
    }

    /// Window of the 1-based page `page`.
    pub fn for_page(page: usize, page_size: usize) -> Self {
        Self::new(page.saturating_sub(1) * page_size, page_size)
    }
}

/// What the view currently shows.
///
/// `sort` is `None` when ordering is done locally; a client-side sort change
/// does not alter the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryDescriptor {
    pub filters: Filters,
    pub sort: Option<SortSpec>,
    pub window: Window,
}

impl QueryDescriptor {
    /// Parameters sent to the source. Client-filter mode fetches unfiltered.
    pub fn to_request(&self, filter_mode: FilterMode) -> FetchRequest {
        let mut request = FetchRequest {
            skip: self.window.skip,
            take: self.window.take,
            sort: self.sort.clone(),
            ..FetchRequest::default()
        };
        if filter_mode == FilterMode::Server {
            request.status = self.filters.status;
            request.tag = self.filters.tag.clone();
            request.search = self.filters.search.clone();
        }
        request
    }
}

/// A single fetch as seen by a `CollectionSource`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub skip: usize,
    pub take: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl FetchRequest {
    pub fn window(skip: usize, take: usize) -> Self {
        Self {
            skip,
            take,
            ..Self::default()
        }
    }

    pub fn filters(&self) -> Filters {
        Filters {
            status: self.status,
            tag: self.tag.clone(),
            search: self.search.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_monotonic() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next().get(), 2);
    }

    #[test]
    fn test_page_window_offsets() {
        assert_eq!(Window::for_page(1, 7), Window::new(0, 7));
        assert_eq!(Window::for_page(3, 7), Window::new(14, 7));
    }

    #[test]
    fn test_blank_search_clears_facet() {
        assert_eq!(Filters::default().with_search("   ").search, None);
        assert_eq!(
            Filters::default().with_search("  goa ").search.as_deref(),
            Some("goa")
        );
    }

    #[test]
    fn test_request_carries_filters_only_in_server_mode() {
        let descriptor = QueryDescriptor {
            filters: Filters::default()
                .with_status(Some(ItemStatus::Draft))
                .with_tag(Some(TagId::new("wedding"))),
            sort: Some(SortSpec::desc("date")),
            window: Window::new(7, 7),
        };

        let server = descriptor.to_request(FilterMode::Server);
        assert_eq!(server.status, Some(ItemStatus::Draft));
        assert_eq!(server.tag, Some(TagId::new("wedding")));
        assert_eq!(server.skip, 7);

        let client = descriptor.to_request(FilterMode::Client);
        assert!(client.filters().is_empty());
        assert_eq!(client.sort, Some(SortSpec::desc("date")));
    }
}
