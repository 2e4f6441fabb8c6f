//! Reels feed loader.
//!
//! Nothing is requested until auth has resolved. After that pages are
//! fetched one at a time, appended in server order, and the loader stops
//! for good once the server says there is nothing more.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::api::MarketplaceApi;
use crate::auth::{wait_ready, AuthState};
use crate::config::ClientConfig;
use crate::core::errors::ApiError;
use crate::core::helpers::lock;
use crate::core::query_params::FeedQuery;
use crate::lifecycle::Mounted;
use crate::models::models::{FeedPage, Reel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    AwaitingAuth,
    Idle,
    /// A request for the current cursor is outstanding.
    Fetching,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { count: usize, has_more: bool },
    Failed,
    /// Response arrived after unmount, or for a cursor we are no longer on.
    Discarded,
}

#[derive(Debug)]
struct FeedState {
    phase: FeedPhase,
    cursor: u32,
    has_more: bool,
    items: Vec<Reel>,
}

pub struct FeedLoader {
    api: Arc<dyn MarketplaceApi>,
    page_size: usize,
    sort: String,
    state: Mutex<FeedState>,
    mounted: Mounted,
}

impl FeedLoader {
    pub fn new(api: Arc<dyn MarketplaceApi>, config: &ClientConfig) -> Self {
        Self {
            api,
            page_size: config.page_size.max(1),
            sort: config.sort.clone(),
            state: Mutex::new(FeedState {
                phase: FeedPhase::AwaitingAuth,
                cursor: 1,
                has_more: true,
                items: Vec::new(),
            }),
            mounted: Mounted::new(),
        }
    }

    pub fn phase(&self) -> FeedPhase {
        lock(&self.state).phase
    }

    /// Page number the next fetch will ask for.
    pub fn cursor(&self) -> u32 {
        lock(&self.state).cursor
    }

    pub fn has_more(&self) -> bool {
        lock(&self.state).has_more
    }

    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> Vec<Reel> {
        lock(&self.state).items.clone()
    }

    pub fn mounted(&self) -> Mounted {
        self.mounted.clone()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    /// Leave `AwaitingAuth`. Only the first call has any effect.
    pub fn auth_ready(&self) -> bool {
        if !self.mounted.is_mounted() {
            return false;
        }
        let mut state = lock(&self.state);
        if state.phase != FeedPhase::AwaitingAuth {
            return false;
        }
        state.phase = FeedPhase::Idle;
        tracing::debug!("feed unblocked by auth");
        true
    }

    /// Block until the auth store reports readiness, then unblock the loader.
    /// Returns `false` if the store went away or the loader was unmounted
    /// in the meantime.
    pub async fn wait_for_auth(&self, mut rx: watch::Receiver<AuthState>) -> bool {
        if !wait_ready(&mut rx).await {
            tracing::warn!("auth store dropped before it became ready");
            return false;
        }
        self.auth_ready();
        self.mounted.is_mounted()
    }

    /// Wait for auth, then do the first load.
    pub async fn run(&self, rx: watch::Receiver<AuthState>) -> Option<FetchOutcome> {
        if !self.wait_for_auth(rx).await {
            return None;
        }
        self.on_render().await
    }

    /// Effect hook: loads the first page when nothing is loaded yet. Safe to
    /// call on every re-render.
    pub async fn on_render(&self) -> Option<FetchOutcome> {
        let query = self.begin_initial()?;
        Some(self.fetch(query).await)
    }

    /// Load the page after the last one loaded.
    pub async fn load_more(&self) -> Option<FetchOutcome> {
        let query = self.begin_more()?;
        Some(self.fetch(query).await)
    }

    pub fn begin_initial(&self) -> Option<FeedQuery> {
        let mut state = lock(&self.state);
        if !state.items.is_empty() {
            return None;
        }
        self.start_fetch(&mut state)
    }

    pub fn begin_more(&self) -> Option<FeedQuery> {
        let mut state = lock(&self.state);
        self.start_fetch(&mut state)
    }

    fn start_fetch(&self, state: &mut FeedState) -> Option<FeedQuery> {
        if !self.mounted.is_mounted() || state.phase != FeedPhase::Idle || !state.has_more {
            return None;
        }
        state.phase = FeedPhase::Fetching;
        Some(FeedQuery::new(state.cursor, self.page_size, self.sort.clone()))
    }

    async fn fetch(&self, query: FeedQuery) -> FetchOutcome {
        let result = self.api.list_reels(&query).await;
        self.settle(&query, result)
    }

    /// Apply the response for `query`.
    pub fn settle(
        &self,
        query: &FeedQuery,
        result: Result<FeedPage<Reel>, ApiError>,
    ) -> FetchOutcome {
        if !self.mounted.is_mounted() {
            tracing::debug!(page = query.page, "feed response after unmount dropped");
            return FetchOutcome::Discarded;
        }

        let mut state = lock(&self.state);
        if state.phase != FeedPhase::Fetching || state.cursor != query.page {
            tracing::warn!(
                page = query.page,
                cursor = state.cursor,
                "stale feed response dropped"
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                let count = page.items.len();
                state.items.extend(page.items);
                state.has_more = page.has_more;
                state.cursor += 1;
                state.phase = if page.has_more {
                    FeedPhase::Idle
                } else {
                    FeedPhase::Exhausted
                };
                tracing::debug!(
                    page = query.page,
                    count,
                    has_more = page.has_more,
                    total = state.items.len(),
                    "feed page loaded"
                );
                FetchOutcome::Loaded {
                    count,
                    has_more: page.has_more,
                }
            }
            Err(err) => {
                tracing::warn!(page = query.page, error = %err, "feed page failed");
                state.phase = FeedPhase::Idle;
                FetchOutcome::Failed
            }
        }
    }
}
