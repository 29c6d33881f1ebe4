//! Async driver for a `CollectionView`.
//!
//! The engine never awaits. A session runs each `Effect` against the source
//! on its own tokio task and applies completions back to the engine, one at
//! a time, in the order they finish. Every call is bounded by the configured
//! fetch timeout.

pub mod clock;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::error::{FolioError, Result};
use crate::source::CollectionSource;
use crate::view::{
    CollectionView, Completion, Effect, MutationOp, MutationOutcome, ScrollMetrics, ScrollSurface,
    ViewAction, ViewModel, compute_view_model,
};

pub use clock::{ClockTicker, now_display};

pub struct ViewSession<S: CollectionSource + 'static> {
    view: CollectionView,
    source: Arc<S>,
    surface: ScrollSurface,
    tasks: JoinSet<Completion>,
    clock: ClockTicker,
    timeout: Duration,
}

impl<S: CollectionSource + 'static> ViewSession<S> {
    pub fn new(config: ViewConfig, source: Arc<S>) -> Result<Self> {
        let timeout = config.fetch_timeout();
        let clock = ClockTicker::new(config.clock_interval());
        let view = CollectionView::new(config)?;
        Ok(Self {
            view,
            source,
            surface: ScrollSurface::default(),
            tasks: JoinSet::new(),
            clock,
            timeout,
        })
    }

    /// Activate the view and start the clock. Must run inside a tokio runtime.
    pub fn activate(&mut self) {
        let effects = self.view.activate(&self.surface);
        self.spawn_all(effects);
        self.clock.start();
    }

    pub fn dispatch(&mut self, action: ViewAction) -> Result<()> {
        let effects = self.view.dispatch(action)?;
        self.spawn_all(effects);
        Ok(())
    }

    pub fn scroll(&mut self, metrics: &ScrollMetrics) {
        let effects = self.view.on_scroll(metrics);
        self.spawn_all(effects);
    }

    /// Wait for the next effect to finish and apply it.
    ///
    /// Returns `false` once nothing is outstanding.
    pub async fn settle_next(&mut self) -> bool {
        loop {
            match self.tasks.join_next().await {
                None => return false,
                Some(Ok(completion)) => {
                    let follow_up = self.view.settle(completion);
                    self.spawn_all(follow_up);
                    return true;
                }
                Some(Err(e)) if e.is_cancelled() => continue,
                Some(Err(e)) => {
                    warn!(error = %e, "effect task failed");
                    continue;
                }
            }
        }
    }

    /// Settle completions until no effect is outstanding.
    pub async fn run_until_idle(&mut self) {
        while self.settle_next().await {}
    }

    /// Tear down: abort outstanding work, release the scroll listener and
    /// stop the clock.
    pub fn deactivate(&mut self) {
        self.tasks.abort_all();
        self.view.deactivate();
        self.clock.stop();
    }

    /// Drop the notice if it has been up for `TOAST_TTL` as of `now`.
    pub fn expire_notice(&mut self, now: Instant) {
        self.view.expire_notice(now);
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn view(&self) -> &CollectionView {
        &self.view
    }

    pub fn view_model(&self) -> ViewModel {
        compute_view_model(&self.view)
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }

    pub fn clock(&self) -> &ClockTicker {
        &self.clock
    }

    fn spawn_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            debug!(?effect, "spawning effect");
            let source = Arc::clone(&self.source);
            let limit = self.timeout;
            self.tasks
                .spawn(async move { execute(source.as_ref(), effect, limit).await });
        }
    }
}

impl<S: CollectionSource + 'static> Drop for ViewSession<S> {
    fn drop(&mut self) {
        self.tasks.abort_all();
    }
}

/// Run one effect against the source.
pub async fn execute<S: CollectionSource>(source: &S, effect: Effect, limit: Duration) -> Completion {
    match effect {
        Effect::Fetch(ticket) => {
            let result = with_timeout(limit, source.fetch_page(&ticket.request)).await;
            Completion::Fetched { ticket, result }
        }
        Effect::Mutate(op) => {
            let target = op.target();
            let result = match op {
                MutationOp::Create(draft) => with_timeout(limit, source.create_item(draft))
                    .await
                    .map(MutationOutcome::Created),
                MutationOp::Update(id, draft) => with_timeout(limit, source.update_item(id, draft))
                    .await
                    .map(MutationOutcome::Updated),
                MutationOp::Delete(id) => with_timeout(limit, source.delete_item(id))
                    .await
                    .map(|()| MutationOutcome::Deleted(id)),
            };
            Completion::Mutated { target, result }
        }
        Effect::FetchStats(generation) => Completion::Stats {
            generation,
            result: with_timeout(limit, source.fetch_stats()).await,
        },
    }
}

async fn with_timeout<T>(limit: Duration, op: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result,
        Err(_) => Err(FolioError::Timeout(limit.as_secs())),
    }
}
