use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user driving interactions.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Actor {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowTarget {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub is_followed_by_me: bool,
    #[serde(default)]
    pub followers_count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_initially_wishlisted: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    pub id: String,
    pub video_url: String,
    #[serde(default)]
    pub caption: String,
    pub author_id: String,
    #[serde(default)]
    pub likes_count: u64,
    pub created_at: DateTime<Utc>,
}

/// One page of a listing, in server order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage<T> {
    #[serde(alias = "reels")]
    pub items: Vec<T>,
    pub has_more: bool,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Follow,
    Wishlist,
}

/// Flag plus optional counter for a single actor/target relationship.
/// `count` is only tracked for follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationshipState {
    pub active: bool,
    pub count: Option<u64>,
}

impl RelationshipState {
    pub fn flipped(self) -> Self {
        let active = !self.active;
        let count = self.count.map(|c| {
            if active {
                c.saturating_add(1)
            } else {
                c.saturating_sub(1)
            }
        });
        Self { active, count }
    }
}

impl From<&FollowTarget> for RelationshipState {
    fn from(target: &FollowTarget) -> Self {
        Self {
            active: target.is_followed_by_me,
            count: Some(target.followers_count),
        }
    }
}

impl From<&Product> for RelationshipState {
    fn from(product: &Product) -> Self {
        Self {
            active: product.is_initially_wishlisted,
            count: None,
        }
    }
}
