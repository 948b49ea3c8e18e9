//! Wire types for the X API v2 endpoints this crate calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use veyra_core::PublicMetrics;

/// Standard v2 response envelope. `data` is absent when nothing matched.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMeta {
    pub next_token: Option<String>,
}

/// An entry in the `errors` array, or the top-level problem document
/// returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiProblem {
    pub title: Option<String>,
    pub detail: Option<String>,
    pub message: Option<String>,
}

impl ApiProblem {
    pub(crate) fn describe(&self) -> Option<String> {
        self.detail
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.title.clone())
    }
}

/// An X account. Fields other than `id`, `username`, and `name` are kept
/// verbatim in `extra` so follower profiles can be stored as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A post as returned by the user timeline endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct XPost {
    pub id: String,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

/// One page of a user's followers.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowersPage {
    pub users: Vec<XUser>,
    pub next_token: Option<String>,
}

/// The post created by `POST /tweets`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPost {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Parameters for a user timeline request.
#[derive(Debug, Clone)]
pub struct RecentPostsQuery {
    /// Requested page size; clamped to the API's accepted `5..=100`.
    pub max_results: usize,
    /// Oldest creation time to include.
    pub start_time: DateTime<Utc>,
    /// Post kinds to leave out, e.g. `retweets`, `replies`.
    pub exclude: Vec<String>,
    /// Extra `tweet.fields` to request.
    pub tweet_fields: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatePostBody<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyTarget<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReplyTarget<'a> {
    pub in_reply_to_tweet_id: &'a str,
}
