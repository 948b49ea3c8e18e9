//! HTTP client for the X API v2.
//!
//! One `XClient` wraps one token. The read side (user lookup, followers,
//! timelines) takes an app bearer token; posting needs a user-context access
//! token, so callers build a separate client for writes.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::XApiError;
use crate::types::{
    ApiProblem, CreatePostBody, CreatedPost, Envelope, FollowersPage, RecentPostsQuery,
    ReplyTarget, XPost, XUser,
};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2/";

const TIMELINE_MIN_RESULTS: usize = 5;
const TIMELINE_MAX_RESULTS: usize = 100;
const FOLLOWERS_MAX_PAGE_SIZE: usize = 1000;
const USER_FIELDS: &str = "created_at,description,location,public_metrics,verified";

/// Client for the X API v2.
///
/// Use [`XClient::new`] for production or [`XClient::with_base_url`] to point
/// at a mock server in tests.
pub struct XClient {
    client: Client,
    token: String,
    base_url: Url,
}

impl std::fmt::Debug for XClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl XClient {
    /// Creates a client pointed at the production X API.
    ///
    /// # Errors
    ///
    /// Returns [`XApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: &str, timeout_secs: u64) -> Result<Self, XApiError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`XApiError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`XApiError::InvalidBaseUrl`] if `base_url` cannot carry a path.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, XApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("veyra/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| XApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(XApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: parsed,
        })
    }

    /// Resolves a username to its X account.
    ///
    /// # Errors
    ///
    /// - [`XApiError::UserNotFound`] if no account has this username.
    /// - [`XApiError::Api`] on a non-2xx status.
    /// - [`XApiError::Http`] on network failure.
    /// - [`XApiError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_user(&self, username: &str) -> Result<XUser, XApiError> {
        let url = self.endpoint(&["users", "by", "username", username]);
        let context = format!("get_user(username={username})");
        let envelope: Envelope<XUser> = self.get_json(url, &context).await?;

        envelope.data.ok_or_else(|| XApiError::UserNotFound {
            username: username.to_string(),
        })
    }

    /// Fetches one page of followers for `user_id`.
    ///
    /// `page_size` is clamped to the API's accepted `1..=1000`.
    ///
    /// # Errors
    ///
    /// - [`XApiError::Api`] on a non-2xx status.
    /// - [`XApiError::Http`] on network failure.
    /// - [`XApiError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_followers(
        &self,
        user_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<FollowersPage, XApiError> {
        let mut url = self.endpoint(&["users", user_id, "followers"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "max_results",
                &page_size.clamp(1, FOLLOWERS_MAX_PAGE_SIZE).to_string(),
            );
            pairs.append_pair("user.fields", USER_FIELDS);
            if let Some(token) = page_token {
                pairs.append_pair("pagination_token", token);
            }
        }

        let context = format!("get_followers(id={user_id})");
        let envelope: Envelope<Vec<XUser>> = self.get_json(url, &context).await?;

        Ok(FollowersPage {
            users: envelope.data.unwrap_or_default(),
            next_token: envelope.meta.and_then(|m| m.next_token),
        })
    }

    /// Fetches recent posts from a user's timeline.
    ///
    /// `created_at`, `text`, and `public_metrics` are always requested in
    /// addition to `query.tweet_fields`. An empty timeline is an empty vec.
    ///
    /// # Errors
    ///
    /// - [`XApiError::Api`] on a non-2xx status.
    /// - [`XApiError::Http`] on network failure.
    /// - [`XApiError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_user_tweets(
        &self,
        user_id: &str,
        query: &RecentPostsQuery,
    ) -> Result<Vec<XPost>, XApiError> {
        let mut fields: Vec<&str> = vec!["created_at", "text", "public_metrics"];
        for field in &query.tweet_fields {
            if !fields.contains(&field.as_str()) {
                fields.push(field.as_str());
            }
        }

        let mut url = self.endpoint(&["users", user_id, "tweets"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "max_results",
                &query
                    .max_results
                    .clamp(TIMELINE_MIN_RESULTS, TIMELINE_MAX_RESULTS)
                    .to_string(),
            );
            pairs.append_pair(
                "start_time",
                &query
                    .start_time
                    .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            );
            pairs.append_pair("tweet.fields", &fields.join(","));
            if !query.exclude.is_empty() {
                pairs.append_pair("exclude", &query.exclude.join(","));
            }
        }

        let context = format!("get_user_tweets(id={user_id})");
        let envelope: Envelope<Vec<XPost>> = self.get_json(url, &context).await?;

        Ok(envelope.data.unwrap_or_default())
    }

    /// Publishes a post, optionally as a reply to `reply_to`.
    ///
    /// # Errors
    ///
    /// - [`XApiError::Api`] on a non-2xx status (including 429).
    /// - [`XApiError::Http`] on network failure.
    /// - [`XApiError::Deserialize`] if the body does not match the expected shape.
    pub async fn create_post(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<CreatedPost, XApiError> {
        let url = self.endpoint(&["tweets"]);
        let body = CreatePostBody {
            text,
            reply: reply_to.map(|id| ReplyTarget {
                in_reply_to_tweet_id: id,
            }),
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        let envelope: Envelope<CreatedPost> = Self::parse(response, "create_post").await?;
        envelope.data.ok_or_else(|| XApiError::Api {
            status: 200,
            message: envelope
                .errors
                .first()
                .and_then(ApiProblem::describe)
                .unwrap_or_else(|| "response carried no post".to_string()),
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Construction rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, XApiError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::parse(response, context).await
    }

    /// Maps non-2xx statuses to [`XApiError::Api`] and parses the body.
    async fn parse<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, XApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiProblem>(&body)
                .ok()
                .as_ref()
                .and_then(ApiProblem::describe)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(XApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| XApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}
