//! Collection view engine.
//!
//! `CollectionView` is a synchronous state machine. User intents arrive as
//! `ViewAction`s through `dispatch`, source answers arrive as `Completion`s
//! through `settle`, and both return the `Effect`s the caller must run. Nothing
//! here awaits; `crate::session::ViewSession` executes effects on tokio tasks
//! and feeds completions back one at a time.
//!
//! Every fetch is stamped with the `Generation` current when it was issued.
//! A completion whose generation is no longer current is dropped, which is
//! what makes a superseded fetch harmless. Stats requests carry their own
//! counter of the same type, so an older stats answer is dropped as well.

pub mod confirm;
pub mod model;
pub mod pagination;
pub mod scroll;
pub mod tags;
pub mod toast;


use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ViewConfig;
use crate::error::{ErrorKind, Result};
use crate::query::{
    FetchRequest, FilterMode, Filters, Generation, QueryDescriptor, SortMode, SortSpec, Window,
    filter_items, normalize_search, sort_items,
};
use crate::source::{CollectionStats, PageResult};
use crate::types::{Item, ItemDraft, ItemId, ItemStatus, TagId};

pub use confirm::ConfirmationState;
pub use model::{ListState, PaginationViewModel, ViewModel, compute_view_model, share_path};
pub use pagination::{LoadMode, Pagination, PaginationState};
pub use scroll::{ScrollMetrics, ScrollRegistration, ScrollSurface, ScrollTrigger};
pub use tags::{TagIndex, TagUsage};
pub use toast::{TOAST_TTL, Toast, ToastLevel};

// ============================================================================
// Actions and effects
// ============================================================================

/// Named user intents.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Filter by status; `None` shows all.
    SetStatus(Option<ItemStatus>),
    /// Select a tag, or clear it if it is already selected.
    ToggleTag(TagId),
    ClearTag,
    SetSearch(String),
    /// Clear status, tag and search in one step.
    ResetFilters,
    /// Sort by a field: same field flips direction, new field is ascending.
    SortBy(String),
    SetSort(SortSpec),
    RequestPage(usize),
    NextPage,
    PreviousPage,
    SetPageSize(usize),
    LoadNextBatch,
    /// Re-run the current descriptor after a failure.
    Retry,
    RefreshStats,
    CreateItem(ItemDraft),
    UpdateItem(ItemId, ItemDraft),
    SetItemStatus(ItemId, ItemStatus),
    RequestDelete(ItemId),
    CancelDelete,
    ConfirmDelete,
    DismissNotice,
}

/// Whether a fetch replaces the loaded items or extends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Replace,
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: Generation,
    pub request: FetchRequest,
    pub kind: LoadKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOp {
    Create(ItemDraft),
    Update(ItemId, ItemDraft),
    Delete(ItemId),
}

impl MutationOp {
    pub fn target(&self) -> MutationTarget {
        match self {
            MutationOp::Create(_) => MutationTarget::Create,
            MutationOp::Update(id, _) => MutationTarget::Update(*id),
            MutationOp::Delete(id) => MutationTarget::Delete(*id),
        }
    }
}

/// A mutation without its payload, used to match up completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    Create,
    Update(ItemId),
    Delete(ItemId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Created(Item),
    Updated(Item),
    Deleted(ItemId),
}

/// Work the engine asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch(FetchTicket),
    Mutate(MutationOp),
    /// Stamped like a fetch so an older stats answer cannot overwrite a newer one.
    FetchStats(Generation),
}

/// The answer to an `Effect`.
#[derive(Debug)]
pub enum Completion {
    Fetched {
        ticket: FetchTicket,
        result: Result<PageResult>,
    },
    Mutated {
        target: MutationTarget,
        result: Result<MutationOutcome>,
    },
    Stats {
        generation: Generation,
        result: Result<CollectionStats>,
    },
}

/// The most recent failure, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of the latest replace fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing has settled yet for this view.
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    generation: Generation,
    kind: LoadKind,
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug)]
pub struct CollectionView {
    config: ViewConfig,
    filters: Filters,
    /// Sort chosen by the user, whatever the sort mode.
    sort: Option<SortSpec>,
    descriptor: QueryDescriptor,
    generation: Generation,
    pagination: Pagination,
    /// Loaded window in source order, without duplicate ids.
    items: Vec<Item>,
    tags: TagIndex,
    in_flight: Option<InFlight>,
    fetch_status: FetchStatus,
    /// Set when the latest fetch of any kind failed.
    fetch_failed: bool,
    mutations_in_flight: usize,
    error: Option<ViewError>,
    toast: Option<Toast>,
    confirmation: ConfirmationState,
    stats: Option<CollectionStats>,
    stats_generation: Generation,
    scroll: ScrollTrigger,
    active: bool,
}

impl CollectionView {
    pub fn new(config: ViewConfig) -> Result<Self> {
        config.validate()?;
        let pagination = Pagination::from_config(&config);
        let sort = config.default_sort.clone();
        let scroll = ScrollTrigger::new(config.scroll_threshold);
        Ok(Self {
            filters: Filters::default(),
            sort,
            descriptor: QueryDescriptor::default(),
            generation: Generation::default(),
            pagination,
            items: Vec::new(),
            tags: TagIndex::default(),
            in_flight: None,
            fetch_status: FetchStatus::Pending,
            fetch_failed: false,
            mutations_in_flight: 0,
            error: None,
            toast: None,
            confirmation: ConfirmationState::Idle,
            stats: None,
            stats_generation: Generation::default(),
            scroll,
            active: false,
            config,
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start the view: attach the scroll trigger when scrolling, load the
    /// first window and the stats.
    pub fn activate(&mut self, surface: &ScrollSurface) -> Vec<Effect> {
        if self.active {
            return Vec::new();
        }
        self.active = true;
        if self.pagination.mode() == LoadMode::InfiniteScroll {
            self.scroll.start(surface);
        }
        info!(kind = %self.config.kind, mode = %self.config.mode, "view activated");

        let mut effects = self.load(true);
        effects.push(self.issue_stats());
        effects
    }

    /// Stop the view. Listeners are released and anything still in flight
    /// is ignored when it lands.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.scroll.stop();
        self.in_flight = None;
        self.generation = self.generation.next();
        info!("view deactivated");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // ------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------

    /// Apply a user intent and return the work it requires.
    ///
    /// Intents on an inactive view do nothing. The only error is an invalid
    /// page size.
    pub fn dispatch(&mut self, action: ViewAction) -> Result<Vec<Effect>> {
        if !self.active {
            debug!(?action, "ignoring intent on inactive view");
            return Ok(Vec::new());
        }

        let effects = match action {
            ViewAction::SetStatus(status) => {
                let filters = self.filters.clone().with_status(status);
                self.change_filters(filters)
            }
            ViewAction::ToggleTag(tag) => {
                let next = if self.filters.tag.as_ref() == Some(&tag) {
                    None
                } else {
                    Some(tag)
                };
                let filters = self.filters.clone().with_tag(next);
                self.change_filters(filters)
            }
            ViewAction::ClearTag => {
                let filters = self.filters.clone().with_tag(None);
                self.change_filters(filters)
            }
            ViewAction::SetSearch(text) => {
                let mut filters = self.filters.clone();
                filters.search = normalize_search(&text);
                self.change_filters(filters)
            }
            ViewAction::ResetFilters => self.change_filters(Filters::default()),
            ViewAction::SortBy(field) => {
                let spec = match &self.sort {
                    Some(current) => current.select(&field),
                    None => SortSpec::asc(field),
                };
                self.change_sort(spec)
            }
            ViewAction::SetSort(spec) => self.change_sort(spec),
            ViewAction::RequestPage(n) => self.request_page(n),
            ViewAction::NextPage => match self.pagination.page() {
                Some(page) => self.request_page(page + 1),
                None => Vec::new(),
            },
            ViewAction::PreviousPage => match self.pagination.page() {
                Some(page) => self.request_page(page.saturating_sub(1)),
                None => Vec::new(),
            },
            ViewAction::SetPageSize(size) => {
                if self.pagination.set_page_size(size)? {
                    self.load(false)
                } else {
                    self.retry_if_failed()
                }
            }
            ViewAction::LoadNextBatch => self.request_next_batch(),
            ViewAction::Retry => {
                if self.in_flight.is_some() {
                    Vec::new()
                } else {
                    self.refresh()
                }
            }
            ViewAction::RefreshStats => vec![self.issue_stats()],
            ViewAction::CreateItem(draft) => self.mutate(MutationOp::Create(draft)),
            ViewAction::UpdateItem(id, draft) => self.mutate(MutationOp::Update(id, draft)),
            ViewAction::SetItemStatus(id, status) => {
                self.mutate(MutationOp::Update(id, ItemDraft::new().status(status)))
            }
            ViewAction::RequestDelete(id) => {
                if !self.confirmation.request(id) {
                    debug!(%id, "delete already committing, request ignored");
                }
                Vec::new()
            }
            ViewAction::CancelDelete => {
                self.confirmation.cancel();
                Vec::new()
            }
            ViewAction::ConfirmDelete => match self.confirmation.confirm() {
                Some(id) => self.mutate(MutationOp::Delete(id)),
                None => Vec::new(),
            },
            ViewAction::DismissNotice => {
                self.toast = None;
                Vec::new()
            }
        };
        Ok(effects)
    }

    /// Handle a scroll event. Fires at most one batch fetch per crossing.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> Vec<Effect> {
        if self.active && self.scroll.is_near_bottom(metrics) {
            self.request_next_batch()
        } else {
            Vec::new()
        }
    }

    fn change_filters(&mut self, filters: Filters) -> Vec<Effect> {
        if filters == self.filters {
            return self.retry_if_failed();
        }
        self.filters = filters;
        self.pagination.reset();
        self.load(false)
    }

    fn change_sort(&mut self, spec: SortSpec) -> Vec<Effect> {
        if self.sort.as_ref() == Some(&spec) {
            return self.retry_if_failed();
        }
        self.sort = Some(spec);
        match self.config.sort_mode {
            SortMode::Client => Vec::new(),
            SortMode::Server => {
                self.pagination.reset();
                self.load(false)
            }
        }
    }

    fn request_page(&mut self, n: usize) -> Vec<Effect> {
        if self.pagination.page_window(n).is_none() {
            debug!(page = n, total_pages = self.pagination.total_pages(), "page out of range");
            return Vec::new();
        }
        self.pagination.set_page(n);
        self.load(false)
    }

    fn request_next_batch(&mut self) -> Vec<Effect> {
        if self.in_flight.is_some() {
            return Vec::new();
        }
        let Some(window) = self.pagination.next_batch_window() else {
            return Vec::new();
        };
        vec![self.issue_fetch(window, LoadKind::Append)]
    }

    /// Re-run an unchanged descriptor only when its last fetch failed.
    fn retry_if_failed(&mut self) -> Vec<Effect> {
        if self.fetch_failed && self.in_flight.is_none() {
            self.refresh()
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    fn build_descriptor(&self) -> QueryDescriptor {
        QueryDescriptor {
            filters: self.filters.clone(),
            sort: match self.config.sort_mode {
                SortMode::Server => self.sort.clone(),
                SortMode::Client => None,
            },
            window: self.pagination.current_window(),
        }
    }

    /// Make the descriptor current and fetch it, unless it already is
    /// current and either loaded or loading.
    fn load(&mut self, force: bool) -> Vec<Effect> {
        let descriptor = self.build_descriptor();
        let settled_ok = self.fetch_status == FetchStatus::Loaded && !self.fetch_failed;
        let loading = matches!(
            self.in_flight,
            Some(InFlight {
                kind: LoadKind::Replace,
                ..
            })
        );
        if !force && descriptor == self.descriptor && (settled_ok || loading) {
            debug!("descriptor unchanged, no fetch");
            return Vec::new();
        }

        self.descriptor = descriptor;
        self.generation = self.generation.next();
        let window = self.descriptor.window;
        vec![self.issue_fetch(window, LoadKind::Replace)]
    }

    /// Reload everything currently shown under a new generation.
    fn refresh(&mut self) -> Vec<Effect> {
        self.descriptor = self.build_descriptor();
        self.generation = self.generation.next();
        let window = self.pagination.refresh_window();
        vec![self.issue_fetch(window, LoadKind::Replace)]
    }

    fn issue_fetch(&mut self, window: Window, kind: LoadKind) -> Effect {
        let mut request = self.descriptor.to_request(self.config.filter_mode);
        request.skip = window.skip;
        request.take = window.take;

        self.in_flight = Some(InFlight {
            generation: self.generation,
            kind,
        });
        debug!(
            generation = self.generation.get(),
            skip = request.skip,
            take = request.take,
            ?kind,
            "issuing fetch"
        );
        Effect::Fetch(FetchTicket {
            generation: self.generation,
            request,
            kind,
        })
    }

    fn issue_stats(&mut self) -> Effect {
        self.stats_generation = self.stats_generation.next();
        Effect::FetchStats(self.stats_generation)
    }

    fn mutate(&mut self, op: MutationOp) -> Vec<Effect> {
        self.mutations_in_flight += 1;
        debug!(op = ?op.target(), "issuing mutation");
        vec![Effect::Mutate(op)]
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Apply a source answer and return any follow-up work.
    pub fn settle(&mut self, completion: Completion) -> Vec<Effect> {
        if !self.active {
            debug!("view inactive, dropping completion");
            return Vec::new();
        }
        match completion {
            Completion::Fetched { ticket, result } => self.settle_fetch(ticket, result),
            Completion::Mutated { target, result } => self.settle_mutation(target, result),
            Completion::Stats { generation, result } => {
                self.settle_stats(generation, result);
                Vec::new()
            }
        }
    }

    fn settle_fetch(&mut self, ticket: FetchTicket, result: Result<PageResult>) -> Vec<Effect> {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation.get(),
                current = self.generation.get(),
                "discarding stale fetch result"
            );
            return Vec::new();
        }
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!(error = %err, kind = ?ticket.kind, "fetch failed");
                self.fetch_failed = true;
                if ticket.kind == LoadKind::Replace {
                    self.fetch_status = FetchStatus::Failed;
                }
                self.error = Some(ViewError {
                    kind: err.fetch_kind(),
                    message: err.to_string(),
                });
                return Vec::new();
            }
        };

        self.fetch_failed = false;
        self.error = None;
        match ticket.kind {
            LoadKind::Replace => {
                self.items = dedupe(page.items);
                self.pagination.record_replace(self.items.len(), page.total_count);
                self.fetch_status = FetchStatus::Loaded;
            }
            LoadKind::Append => {
                let known: HashSet<ItemId> = self.items.iter().map(|i| i.id).collect();
                let before = self.items.len();
                self.items
                    .extend(dedupe(page.items).into_iter().filter(|i| !known.contains(&i.id)));
                let fresh = self.items.len() - before;
                self.pagination.record_append(fresh, page.total_count);
            }
        }
        self.tags = TagIndex::from_items(&self.items);

        // An empty collection still has page 1.
        let last_page = self.pagination.total_pages().max(1);
        match self.pagination.page() {
            Some(page) if page > last_page => {
                debug!(page, last_page, "page no longer exists, moving to last page");
                self.pagination.set_page(last_page);
                self.load(false)
            }
            _ => Vec::new(),
        }
    }

    fn settle_mutation(
        &mut self,
        target: MutationTarget,
        result: Result<MutationOutcome>,
    ) -> Vec<Effect> {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
        if let MutationTarget::Delete(id) = target {
            self.confirmation.settle(id);
        }

        match result {
            Ok(outcome) => {
                let notice = match &outcome {
                    MutationOutcome::Created(item) => format!("Created '{}'", item.label()),
                    MutationOutcome::Updated(item) => format!("Updated '{}'", item.label()),
                    MutationOutcome::Deleted(id) => format!("Deleted item {id}"),
                };
                info!(op = ?target, "{notice}");
                self.error = None;
                self.toast = Some(Toast::info(notice));

                let mut effects = self.refresh();
                effects.push(self.issue_stats());
                effects
            }
            Err(err) => {
                warn!(op = ?target, error = %err, "mutation failed");
                self.error = Some(ViewError {
                    kind: err.mutation_kind(),
                    message: err.to_string(),
                });
                self.toast = Some(Toast::error(err.to_string()));
                Vec::new()
            }
        }
    }

    fn settle_stats(&mut self, generation: Generation, result: Result<CollectionStats>) {
        if generation != self.stats_generation {
            debug!(
                stale = generation.get(),
                current = self.stats_generation.get(),
                "discarding stale stats"
            );
            return;
        }
        match result {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => {
                warn!(error = %err, "stats unavailable");
                self.toast = Some(Toast::warning(format!("Stats unavailable: {err}")));
            }
        }
    }

    /// Drop the notice once it has been up long enough.
    pub fn expire_notice(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Loaded window in source order.
    pub fn loaded_items(&self) -> &[Item] {
        &self.items
    }

    /// Loaded window after client-side filtering and sorting.
    pub fn visible_items(&self) -> Vec<Item> {
        let mut items = match self.config.filter_mode {
            FilterMode::Client => filter_items(
                &self.items,
                &self.filters,
                &self.config.search_fields,
                self.config.search_match,
            ),
            FilterMode::Server => self.items.clone(),
        };
        if self.config.sort_mode == SortMode::Client {
            if let Some(spec) = &self.sort {
                sort_items(&mut items, spec);
            }
        }
        items
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_mutating(&self) -> bool {
        self.mutations_in_flight > 0
    }

    pub fn fetch_status(&self) -> FetchStatus {
        self.fetch_status
    }

    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn confirmation(&self) -> ConfirmationState {
        self.confirmation
    }

    pub fn stats(&self) -> Option<&CollectionStats> {
        self.stats.as_ref()
    }

    pub fn scroll_trigger(&self) -> &ScrollTrigger {
        &self.scroll
    }

    pub fn find_item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Keep the first occurrence of each id.
fn dedupe(items: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.id)).collect()
}
