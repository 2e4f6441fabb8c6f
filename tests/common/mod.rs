#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use uuid::Uuid;

use runway::core::query_params::FeedQuery;
use runway::models::models::{Actor, FeedPage, Reel};
use runway::{ApiError, AuthStore, ChannelNotifier, Collaborators, MarketplaceApi, Notice};

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleCall {
    pub kind: &'static str,
    pub token: String,
    pub target_id: String,
    pub request_id: Uuid,
}

/// In-memory API with scripted answers. With a gate, every call is recorded
/// first and then parks until the test hands out a permit.
#[derive(Default)]
pub struct FakeApi {
    toggle_calls: Mutex<Vec<ToggleCall>>,
    toggle_results: Mutex<VecDeque<Result<(), ApiError>>>,
    feed_calls: Mutex<Vec<FeedQuery>>,
    pages: Mutex<VecDeque<Result<FeedPage<Reel>, ApiError>>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn push_toggle(&self, result: Result<(), ApiError>) {
        self.toggle_results.lock().unwrap().push_back(result);
    }

    pub fn push_page(&self, items: Vec<Reel>, has_more: bool) {
        self.pages.lock().unwrap().push_back(Ok(FeedPage { items, has_more }));
    }

    pub fn push_page_error(&self, err: ApiError) {
        self.pages.lock().unwrap().push_back(Err(err));
    }

    pub fn toggle_calls(&self) -> Vec<ToggleCall> {
        self.toggle_calls.lock().unwrap().clone()
    }

    pub fn feed_calls(&self) -> Vec<FeedQuery> {
        self.feed_calls.lock().unwrap().clone()
    }

    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    async fn toggle(
        &self,
        kind: &'static str,
        token: &str,
        target_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError> {
        self.toggle_calls.lock().unwrap().push(ToggleCall {
            kind,
            token: token.to_string(),
            target_id: target_id.to_string(),
            request_id,
        });
        self.pass_gate().await;
        self.toggle_results.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl MarketplaceApi for FakeApi {
    async fn toggle_follow(
        &self,
        token: &str,
        target_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError> {
        self.toggle("follow", token, target_id, request_id).await
    }

    async fn toggle_wishlist(
        &self,
        token: &str,
        product_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError> {
        self.toggle("wishlist", token, product_id, request_id).await
    }

    async fn list_reels(&self, query: &FeedQuery) -> Result<FeedPage<Reel>, ApiError> {
        self.feed_calls.lock().unwrap().push(query.clone());
        self.pass_gate().await;
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(FeedPage { items: Vec::new(), has_more: false }))
    }
}

pub fn actor(id: &str) -> Actor {
    Actor {
        id: id.to_string(),
        username: format!("user{}", id),
        token: format!("token-{}", id),
    }
}

pub fn reel(n: usize) -> Reel {
    Reel {
        id: format!("r{}", n),
        video_url: format!("https://cdn.example.com/reels/{}.mp4", n),
        caption: format!("look #{}", n),
        author_id: "7".to_string(),
        likes_count: n as u64,
        created_at: chrono::Utc::now(),
    }
}

pub fn reels(range: std::ops::Range<usize>) -> Vec<Reel> {
    range.map(reel).collect()
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub auth: AuthStore,
    pub notices: tokio::sync::mpsc::UnboundedReceiver<Notice>,
    pub deps: Collaborators,
}

pub fn harness(api: FakeApi) -> Harness {
    let api = Arc::new(api);
    let auth = AuthStore::new();
    let (notifier, notices) = ChannelNotifier::new();
    let deps = Collaborators {
        api: api.clone(),
        auth: auth.clone(),
        notifier: Arc::new(notifier),
    };
    Harness { api, auth, notices, deps }
}

pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

/// Yield until `cond` holds.
pub async fn until(mut cond: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

/// Parse query parameters from a URI string. Only the last value of a
/// repeated key is kept.
pub fn parse_query_params(uri: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if let Some(query_start) = uri.find('?') {
        let query = &uri[query_start + 1..];
        for param in query.split('&').filter(|p| !p.is_empty()) {
            if let Some(eq_idx) = param.find('=') {
                let key = &param[..eq_idx];
                let encoded_value = &param[eq_idx + 1..];
                let decoded = urlencoding::decode(encoded_value)
                    .unwrap_or(std::borrow::Cow::Borrowed(encoded_value))
                    .to_string();
                params.insert(key.to_string(), decoded);
            } else {
                params.insert(param.to_string(), String::new());
            }
        }
    }

    params
}

/// Read a feed query the way the API server does. Missing, invalid or
/// out-of-range values fall back to the defaults.
pub fn feed_query_from_uri(uri: &str, default_limit: usize, default_sort: &str) -> FeedQuery {
    let params = parse_query_params(uri);
    let page = params
        .get("page")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(1);
    let limit = params
        .get("limit")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default_limit);
    let sort = params
        .get("sort")
        .cloned()
        .unwrap_or_else(|| default_sort.to_string());
    FeedQuery::new(page, limit, sort)
}
