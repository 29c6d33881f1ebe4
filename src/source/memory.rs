//! In-memory `CollectionSource`.
//!
//! Behaves like a paginating backend: it filters, sorts and slices on every
//! fetch and reports the filtered total. Failures and latency can be scripted
//! per call, which is how the session tests provoke out-of-order answers.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::{CollectionSource, CollectionStats, PageResult};
use crate::error::{FolioError, Result};
use crate::query::{FetchRequest, SearchMatch, filter_items, sort_items};
use crate::types::{FieldValue, Item, ItemDraft, ItemId};

#[derive(Default)]
struct MemoryState {
    items: Vec<Item>,
    fetch_failures: usize,
    mutation_failures: usize,
    fetch_delays: VecDeque<Duration>,
}

#[derive(Default)]
pub struct MemorySource {
    state: Mutex<MemoryState>,
    fetch_calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                items,
                ..MemoryState::default()
            }),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Load a JSON array of items.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let items: Vec<Item> = serde_json::from_str(&content)?;
        Ok(Self::new(items))
    }

    pub fn save_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json + "\n")?;
        Ok(())
    }

    /// Copy of every stored item in storage order.
    pub fn snapshot(&self) -> Vec<Item> {
        self.state.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `fetch_page` calls made so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Make the next `n` fetches fail.
    pub fn fail_next_fetches(&self, n: usize) {
        self.state.lock().fetch_failures = n;
    }

    /// Make the next `n` create/update/delete calls fail.
    pub fn fail_next_mutations(&self, n: usize) {
        self.state.lock().mutation_failures = n;
    }

    /// Queue a latency for each of the next fetches, in call order.
    pub fn delay_next_fetches(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().fetch_delays.extend(delays);
    }

    fn take_mutation_failure(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.mutation_failures > 0 {
            state.mutation_failures -= 1;
            return Err(FolioError::MutationFailure("source rejected the change".to_string()));
        }
        Ok(())
    }
}

/// Filter, sort and slice `items` the way a paginating backend would.
pub(crate) fn run_query(items: &[Item], request: &FetchRequest) -> PageResult {
    let mut matching = filter_items(items, &request.filters(), &[], SearchMatch::Substring);
    if let Some(spec) = &request.sort {
        sort_items(&mut matching, spec);
    }
    let total = matching.len();
    let window: Vec<Item> = matching
        .into_iter()
        .skip(request.skip)
        .take(request.take)
        .collect();
    PageResult::new(window, total, request.skip)
}

impl CollectionSource for MemorySource {
    async fn fetch_page(&self, request: &FetchRequest) -> Result<PageResult> {
        let call = self.fetch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.state.lock().fetch_delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock();
        if state.fetch_failures > 0 {
            state.fetch_failures -= 1;
            return Err(FolioError::FetchFailure(format!("fetch #{call} refused")));
        }
        let page = run_query(&state.items, request);
        debug!(
            call,
            skip = request.skip,
            take = request.take,
            returned = page.items.len(),
            total = page.total_count,
            "memory source served page"
        );
        Ok(page)
    }

    async fn create_item(&self, draft: ItemDraft) -> Result<Item> {
        self.take_mutation_failure()?;
        let mut state = self.state.lock();
        let next = state.items.iter().map(|i| i.id.get()).max().unwrap_or(0) + 1;
        let item = draft.into_item(ItemId::new(next));
        state.items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: ItemId, draft: ItemDraft) -> Result<Item> {
        self.take_mutation_failure()?;
        let mut state = self.state.lock();
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(FolioError::NotFound(id))?;
        draft.apply_to(item);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: ItemId) -> Result<()> {
        self.take_mutation_failure()?;
        let mut state = self.state.lock();
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        if state.items.len() == before {
            return Err(FolioError::NotFound(id));
        }
        Ok(())
    }

    async fn fetch_stats(&self) -> Result<CollectionStats> {
        let state = self.state.lock();
        let mut by_status = BTreeMap::new();
        for status in state.items.iter().filter_map(|i| i.status) {
            *by_status.entry(status).or_insert(0) += 1;
        }
        let total_views = state
            .items
            .iter()
            .filter_map(|i| i.field("views").and_then(FieldValue::as_number))
            .map(|v| v.max(0.0) as u64)
            .sum();
        Ok(CollectionStats {
            total: state.items.len(),
            by_status,
            total_views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortSpec;
    use crate::types::{FacetTag, ItemStatus, TagId};

    fn source() -> MemorySource {
        MemorySource::new(
            (1..=16)
                .map(|n| {
                    let status = if n % 2 == 0 {
                        ItemStatus::Draft
                    } else {
                        ItemStatus::Published
                    };
                    let mut item = Item::new(n)
                        .with_status(status)
                        .with_field("title", format!("Post {n}"))
                        .with_field("views", n * 10);
                    if n % 4 == 0 {
                        item = item.with_tag(FacetTag::new("wedding", "Wedding"));
                    }
                    item
                })
                .collect(),
        )
    }

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|i| i.id.get()).collect()
    }

    #[tokio::test]
    async fn test_fetch_slices_and_reports_total() {
        let source = source();
        let page = source.fetch_page(&FetchRequest::window(14, 7)).await.unwrap();
        assert_eq!(ids(&page.items), vec![15, 16]);
        assert_eq!(page.total_count, 16);
        assert!(!page.has_more);
        assert_eq!(source.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_filters_before_counting() {
        let source = source();
        let request = FetchRequest {
            status: Some(ItemStatus::Draft),
            tag: Some(TagId::new("wedding")),
            sort: Some(SortSpec::desc("views")),
            ..FetchRequest::window(0, 10)
        };
        let page = source.fetch_page(&request).await.unwrap();
        assert_eq!(ids(&page.items), vec![16, 12, 8, 4]);
        assert_eq!(page.total_count, 4);
    }

    #[tokio::test]
    async fn test_injected_fetch_failure_is_consumed() {
        let source = source();
        source.fail_next_fetches(1);
        assert!(matches!(
            source.fetch_page(&FetchRequest::window(0, 5)).await,
            Err(FolioError::FetchFailure(_))
        ));
        assert!(source.fetch_page(&FetchRequest::window(0, 5)).await.is_ok());
    }

    #[tokio::test]
    async fn test_mutations_and_not_found() {
        let source = source();
        let created = source
            .create_item(ItemDraft::new().field("title", "Fresh"))
            .await
            .unwrap();
        assert_eq!(created.id, ItemId::new(17));

        let updated = source
            .update_item(ItemId::new(3), ItemDraft::new().status(ItemStatus::Draft))
            .await
            .unwrap();
        assert_eq!(updated.status, Some(ItemStatus::Draft));

        source.delete_item(ItemId::new(5)).await.unwrap();
        assert_eq!(source.len(), 16);
        assert!(matches!(
            source.delete_item(ItemId::new(5)).await,
            Err(FolioError::NotFound(id)) if id == ItemId::new(5)
        ));
        assert!(matches!(
            source.update_item(ItemId::new(99), ItemDraft::new()).await,
            Err(FolioError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_mutation_failure_leaves_items() {
        let source = source();
        source.fail_next_mutations(1);
        assert!(source.delete_item(ItemId::new(1)).await.is_err());
        assert_eq!(source.len(), 16);
    }

    #[tokio::test]
    async fn test_stats_count_statuses_and_views() {
        let stats = source().fetch_stats().await.unwrap();
        assert_eq!(stats.total, 16);
        assert_eq!(stats.count(ItemStatus::Draft), 8);
        assert_eq!(stats.count(ItemStatus::Free), 0);
        assert_eq!(stats.total_views, (1..=16).map(|n| n * 10).sum::<u64>());
    }

    #[test]
    fn test_json_fixture_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        source().save_json_file(&path).unwrap();

        let loaded = MemorySource::from_json_file(&path).unwrap();
        assert_eq!(loaded.len(), 16);
        assert_eq!(loaded.snapshot()[3].tags[0].id, TagId::new("wedding"));
    }
}
