//! Storefront client core.
//!
//! Two pieces of client state sit on top of the marketplace REST API:
//!
//! - [`interaction::InteractionController`] flips a follow or wishlist
//!   relationship immediately and reconciles with the server afterwards.
//! - [`feed::FeedLoader`] pages through the reels feed once auth has
//!   resolved.
//!
//! Auth, notices and the API itself are passed in explicitly so either
//! piece can run against fakes.

pub mod api;
pub mod auth;
pub mod config;
pub mod feed;
pub mod interaction;
pub mod lifecycle;
pub mod notify;

pub mod core {
    pub mod errors;
    pub mod helpers;
    pub mod query_params;
}

pub mod models {
    #[allow(clippy::module_inception)]
    pub mod models;
}

pub use api::{HttpApi, MarketplaceApi};
pub use auth::{AuthState, AuthStore};
pub use config::ClientConfig;
pub use core::errors::ApiError;
pub use feed::{FeedLoader, FeedPhase, FetchOutcome};
pub use interaction::{Collaborators, InteractionController, ToggleOutcome};
pub use notify::{ChannelNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
