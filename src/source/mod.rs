//! The contract between the view engine and wherever items live.

pub mod memory;

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::FetchRequest;
use crate::types::{Item, ItemDraft, ItemId, ItemStatus};

pub use memory::MemorySource;

/// One window of a collection plus the collection's size under the same
/// filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub total_count: usize,
    pub has_more: bool,
}

impl PageResult {
    /// `skip` is the offset the window was fetched at.
    pub fn new(items: Vec<Item>, total_count: usize, skip: usize) -> Self {
        let has_more = skip + items.len() < total_count;
        Self {
            items,
            total_count,
            has_more,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0)
    }
}

/// Dashboard figures for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub total: usize,
    #[serde(default)]
    pub by_status: BTreeMap<ItemStatus, usize>,
    #[serde(default)]
    pub total_views: u64,
}

impl CollectionStats {
    pub fn count(&self, status: ItemStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// A remote collection that can be paged through and mutated.
pub trait CollectionSource: Send + Sync {
    /// Fetch the window described by `request`.
    fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<PageResult>> + Send;

    fn create_item(&self, draft: ItemDraft) -> impl Future<Output = Result<Item>> + Send;

    /// Fails with `FolioError::NotFound` when `id` does not exist.
    fn update_item(
        &self,
        id: ItemId,
        draft: ItemDraft,
    ) -> impl Future<Output = Result<Item>> + Send;

    /// Fails with `FolioError::NotFound` when `id` does not exist.
    fn delete_item(&self, id: ItemId) -> impl Future<Output = Result<()>> + Send;

    fn fetch_stats(&self) -> impl Future<Output = Result<CollectionStats>> + Send;
}
