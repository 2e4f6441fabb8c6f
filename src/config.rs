use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_FEED_PAGE_SIZE: usize = 10;
pub const DEFAULT_FEED_SORT: &str = "-createdAt";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const REELS_PATH: &str = "/reels";
pub const WISHLIST_PATH: &str = "/wishlist";

pub fn follow_path(user_id: &str) -> String {
    format!("/users/{}/follow", urlencoding::encode(user_id))
}

pub fn wishlist_path(product_id: &str) -> String {
    format!("{}/{}", WISHLIST_PATH, urlencoding::encode(product_id))
}

pub fn api_base_url() -> String {
    std::env::var("RUNWAY_API_BASE_URL")
        .ok()
        .map(|v| v.trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

pub fn feed_page_size() -> usize {
    std::env::var("RUNWAY_FEED_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_FEED_PAGE_SIZE)
        .max(1)
}

pub fn feed_sort() -> String {
    std::env::var("RUNWAY_FEED_SORT")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FEED_SORT.to_string())
}

pub fn request_timeout() -> Duration {
    let secs = std::env::var("RUNWAY_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Settings shared by the HTTP client and the feed loader.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub page_size: usize,
    pub sort: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: api_base_url(),
            page_size: feed_page_size(),
            sort: feed_sort(),
            timeout: request_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_FEED_PAGE_SIZE,
            sort: DEFAULT_FEED_SORT.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}
