use async_trait::async_trait;
use reqwest::{Client, Response};
use uuid::Uuid;

use crate::config::{self, ClientConfig};
use crate::core::errors::ApiError;
use crate::core::helpers::bearer;
use crate::core::query_params::FeedQuery;
use crate::models::models::{FeedPage, Reel};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// REST endpoints the storefront core talks to.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Flip the follow relationship between the token's user and `target_id`.
    async fn toggle_follow(
        &self,
        token: &str,
        target_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError>;

    /// Flip whether `product_id` is in the token user's wishlist.
    async fn toggle_wishlist(
        &self,
        token: &str,
        product_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError>;

    async fn list_reels(&self, query: &FeedQuery) -> Result<FeedPage<Reel>, ApiError>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to feed requests as well, for personalised
    /// listings. Toggles always carry the actor's own token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_toggle(&self, path: &str, token: &str, request_id: Uuid) -> Result<(), ApiError> {
        tracing::debug!(%path, %request_id, "sending toggle");
        let resp = self
            .client
            .post(self.url(path))
            .header("Authorization", bearer(token))
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await?;
        check_status(resp).await.map(|_| ())
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::from_status(status, &body))
}

#[async_trait]
impl MarketplaceApi for HttpApi {
    async fn toggle_follow(
        &self,
        token: &str,
        target_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError> {
        self.post_toggle(&config::follow_path(target_id), token, request_id).await
    }

    async fn toggle_wishlist(
        &self,
        token: &str,
        product_id: &str,
        request_id: Uuid,
    ) -> Result<(), ApiError> {
        self.post_toggle(&config::wishlist_path(product_id), token, request_id).await
    }

    async fn list_reels(&self, query: &FeedQuery) -> Result<FeedPage<Reel>, ApiError> {
        let url = format!("{}?{}", self.url(config::REELS_PATH), query.to_query_string());
        tracing::debug!(%url, "fetching reels page");

        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.header("Authorization", bearer(token));
        }
        let resp = check_status(req.send().await?).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
