//! In-memory fakes of the pipeline ports.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use veyra_core::{
    Follower, Narrative, PublicMetrics, SentimentTrend, TrackedNode, Tweet, TweetSentiment,
    UnscoredTweet,
};
use veyra_db::DbError;
use veyra_llm::{GenerationParams, LlmError};
use veyra_x::{FollowersPage, RecentPostsQuery, XApiError, XPost, XUser};

use crate::ports::{ReadApi, Store, TextGenerator, WriteApi};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub(crate) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

pub(crate) fn post(id: &str, text: &str) -> XPost {
    XPost {
        id: id.to_string(),
        text: text.to_string(),
        created_at: Some(at(1, 12)),
        public_metrics: PublicMetrics::default(),
    }
}

pub(crate) fn tweet(id: &str, content: &str, created_at: DateTime<Utc>, score: Option<f64>) -> Tweet {
    Tweet {
        tweet_id: id.to_string(),
        content: content.to_string(),
        created_at,
        username: "bonk_inu".to_string(),
        metrics: PublicMetrics::default(),
        sentiment_score: score,
    }
}

pub(crate) fn user(id: &str, username: &str) -> XUser {
    XUser {
        id: id.to_string(),
        username: username.to_string(),
        name: format!("{username} name"),
        extra: serde_json::Map::new(),
    }
}

/// Pages holding `sizes[i]` users each, chained by `page-{i}` tokens.
pub(crate) fn follower_pages(sizes: &[usize]) -> Vec<FollowersPage> {
    let mut next_id = 0;
    sizes
        .iter()
        .enumerate()
        .map(|(i, &size)| {
            let users = (0..size)
                .map(|_| {
                    next_id += 1;
                    user(&format!("f{next_id}"), &format!("follower{next_id}"))
                })
                .collect();
            let next_token = (i + 1 < sizes.len()).then(|| format!("page-{}", i + 1));
            FollowersPage { users, next_token }
        })
        .collect()
}

fn store_failure() -> DbError {
    DbError::Sqlx(sqlx::Error::PoolTimedOut)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    nodes: Vec<TrackedNode>,
    tweets: Vec<Tweet>,
    trends: BTreeMap<String, SentimentTrend>,
    narratives: Vec<Narrative>,
    followers: BTreeMap<String, Follower>,
    score_writes: usize,
    fail_writes: bool,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_node(self, username: &str, user_id: Option<&str>, engagement: i64) -> Self {
        self.state.lock().unwrap().nodes.push(TrackedNode {
            username: username.to_string(),
            user_id: user_id.map(ToString::to_string),
            total_engagement: engagement,
        });
        self
    }

    pub(crate) fn with_tweet(self, tweet: Tweet) -> Self {
        self.state.lock().unwrap().tweets.push(tweet);
        self
    }

    pub(crate) fn with_trend(self, day: &str, average: Option<f64>) -> Self {
        let trend = SentimentTrend {
            day: day.to_string(),
            average_sentiment: average,
            total_tweets: 1,
            updated_at: Utc::now(),
        };
        self.state
            .lock()
            .unwrap()
            .trends
            .insert(day.to_string(), trend);
        self
    }

    pub(crate) fn with_narrative(self, text: &str) -> Self {
        self.state.lock().unwrap().narratives.push(Narrative {
            created_at: Utc::now(),
            narrative: text.to_string(),
            tweets: vec![text.to_string()],
            tweet_ids: vec!["old".to_string()],
        });
        self
    }

    /// Make every write fail with a store error.
    pub(crate) fn failing_writes(self) -> Self {
        self.state.lock().unwrap().fail_writes = true;
        self
    }

    pub(crate) fn tweets(&self) -> Vec<Tweet> {
        self.state.lock().unwrap().tweets.clone()
    }

    pub(crate) fn nodes(&self) -> Vec<TrackedNode> {
        self.state.lock().unwrap().nodes.clone()
    }

    pub(crate) fn trends(&self) -> Vec<SentimentTrend> {
        self.state.lock().unwrap().trends.values().cloned().collect()
    }

    pub(crate) fn narratives(&self) -> Vec<Narrative> {
        self.state.lock().unwrap().narratives.clone()
    }

    pub(crate) fn followers(&self) -> Vec<Follower> {
        self.state.lock().unwrap().followers.values().cloned().collect()
    }

    pub(crate) fn score_writes(&self) -> usize {
        self.state.lock().unwrap().score_writes
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_node(&self, username: &str) -> Result<Option<TrackedNode>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.nodes.iter().find(|n| n.username == username).cloned())
    }

    async fn upsert_node_user_id(&self, username: &str, user_id: &str) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(store_failure());
        }
        if let Some(node) = state.nodes.iter_mut().find(|n| n.username == username) {
            node.user_id = Some(user_id.to_string());
        } else {
            state.nodes.push(TrackedNode {
                username: username.to_string(),
                user_id: Some(user_id.to_string()),
                total_engagement: 0,
            });
        }
        Ok(())
    }

    async fn top_nodes(&self, limit: usize) -> Result<Vec<TrackedNode>, DbError> {
        let mut nodes = self.state.lock().unwrap().nodes.clone();
        nodes.sort_by(|a, b| {
            b.total_engagement
                .cmp(&a.total_engagement)
                .then_with(|| a.username.cmp(&b.username))
        });
        nodes.truncate(limit);
        Ok(nodes)
    }

    async fn tweet_exists(&self, tweet_id: &str) -> Result<bool, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.tweets.iter().any(|t| t.tweet_id == tweet_id))
    }

    async fn insert_tweet_if_absent(&self, tweet: &Tweet) -> Result<bool, DbError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(store_failure());
        }
        if state.tweets.iter().any(|t| t.tweet_id == tweet.tweet_id) {
            return Ok(false);
        }
        state.tweets.push(tweet.clone());
        Ok(true)
    }

    async fn unscored_tweets(&self) -> Result<Vec<UnscoredTweet>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tweets
            .iter()
            .filter(|t| t.sentiment_score.is_none())
            .map(|t| UnscoredTweet {
                tweet_id: t.tweet_id.clone(),
                content: t.content.clone(),
            })
            .collect())
    }

    async fn apply_sentiment_scores(&self, scores: &[(String, f64)]) -> Result<u64, DbError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(store_failure());
        }
        state.score_writes += 1;
        let mut updated = 0;
        for (id, score) in scores {
            if let Some(tweet) = state
                .tweets
                .iter_mut()
                .find(|t| &t.tweet_id == id && t.sentiment_score.is_none())
            {
                tweet.sentiment_score = Some(*score);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn tweet_sentiments(&self) -> Result<Vec<TweetSentiment>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tweets
            .iter()
            .map(|t| TweetSentiment {
                created_at: t.created_at,
                sentiment_score: t.sentiment_score,
            })
            .collect())
    }

    async fn tweet_contents(&self) -> Result<Vec<String>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.tweets.iter().map(|t| t.content.clone()).collect())
    }

    async fn recent_tweet_texts(&self, limit: usize) -> Result<Vec<String>, DbError> {
        let mut tweets = self.state.lock().unwrap().tweets.clone();
        tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tweets.into_iter().take(limit).map(|t| t.content).collect())
    }

    async fn upsert_sentiment_trend(&self, trend: &SentimentTrend) -> Result<(), DbError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(store_failure());
        }
        state.trends.insert(trend.day.clone(), trend.clone());
        Ok(())
    }

    async fn recent_sentiment_trends(
        &self,
        limit: usize,
    ) -> Result<Vec<SentimentTrend>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state.trends.values().rev().take(limit).cloned().collect())
    }

    async fn recent_narratives(&self, limit: usize) -> Result<Vec<String>, DbError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .narratives
            .iter()
            .rev()
            .take(limit)
            .map(|n| n.narrative.clone())
            .collect())
    }

    async fn insert_narrative(&self, narrative: &Narrative) -> Result<i64, DbError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes || narrative.tweet_ids.is_empty() {
            return Err(store_failure());
        }
        state.narratives.push(narrative.clone());
        Ok(i64::try_from(state.narratives.len()).unwrap())
    }

    async fn upsert_followers(&self, followers: &[Follower]) -> Result<(u64, u64), DbError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(store_failure());
        }
        let (mut new, mut updated) = (0, 0);
        for follower in followers {
            if state
                .followers
                .insert(follower.user_id.clone(), follower.clone())
                .is_some()
            {
                updated += 1;
            } else {
                new += 1;
            }
        }
        Ok((new, updated))
    }
}

// ---------------------------------------------------------------------------
// Read API
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub(crate) struct FakeReadApi {
    users: HashMap<String, XUser>,
    posts: HashMap<String, Vec<XPost>>,
    failing_timelines: HashSet<String>,
    follower_pages: Vec<FollowersPage>,
    failing_follower_page: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl FakeReadApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(mut self, id: &str, username: &str) -> Self {
        self.users.insert(username.to_string(), user(id, username));
        self
    }

    pub(crate) fn with_posts(mut self, user_id: &str, posts: Vec<XPost>) -> Self {
        self.posts.insert(user_id.to_string(), posts);
        self
    }

    pub(crate) fn failing_timeline(mut self, user_id: &str) -> Self {
        self.failing_timelines.insert(user_id.to_string());
        self
    }

    pub(crate) fn with_follower_pages(mut self, pages: Vec<FollowersPage>) -> Self {
        self.follower_pages = pages;
        self
    }

    pub(crate) fn failing_follower_page(mut self, index: usize) -> Self {
        self.failing_follower_page = Some(index);
        self
    }

    /// Every call made so far, e.g. `posts:123` or `followers:9:page-1`.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ReadApi for FakeReadApi {
    async fn get_user(&self, username: &str) -> Result<XUser, XApiError> {
        self.record(format!("user:{username}"));
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| XApiError::UserNotFound {
                username: username.to_string(),
            })
    }

    async fn get_followers(
        &self,
        user_id: &str,
        _page_size: usize,
        page_token: Option<&str>,
    ) -> Result<FollowersPage, XApiError> {
        self.record(format!(
            "followers:{user_id}:{}",
            page_token.unwrap_or("start")
        ));
        let index = page_token
            .and_then(|t| t.strip_prefix("page-"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        if self.failing_follower_page == Some(index) {
            return Err(XApiError::Api {
                status: 503,
                message: "followers unavailable".to_string(),
            });
        }
        Ok(self
            .follower_pages
            .get(index)
            .cloned()
            .unwrap_or(FollowersPage {
                users: vec![],
                next_token: None,
            }))
    }

    async fn get_recent_posts(
        &self,
        user_id: &str,
        query: &RecentPostsQuery,
    ) -> Result<Vec<XPost>, XApiError> {
        self.record(format!("posts:{user_id}"));
        assert_eq!(query.exclude, ["retweets", "replies"]);
        if self.failing_timelines.contains(user_id) {
            return Err(XApiError::Api {
                status: 500,
                message: "timeline unavailable".to_string(),
            });
        }
        Ok(self.posts.get(user_id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Write API
// ---------------------------------------------------------------------------

/// Records posts and hands out ids `post-1`, `post-2`, ... by attempt number.
#[derive(Debug, Default)]
pub(crate) struct FakeWriteApi {
    fail_on_attempt: Option<usize>,
    attempts: AtomicUsize,
    posted: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeWriteApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fail the `attempt`-th post (1-based).
    pub(crate) fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on_attempt: Some(attempt),
            ..Self::default()
        }
    }

    /// Successful posts as `(text, reply_to)`.
    pub(crate) fn posted(&self) -> Vec<(String, Option<String>)> {
        self.posted.lock().unwrap().clone()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WriteApi for FakeWriteApi {
    async fn create_post(&self, text: &str, reply_to: Option<&str>) -> Result<String, XApiError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_attempt == Some(attempt) {
            return Err(XApiError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        self.posted
            .lock()
            .unwrap()
            .push((text.to_string(), reply_to.map(ToString::to_string)));
        Ok(format!("post-{attempt}"))
    }
}

// ---------------------------------------------------------------------------
// Text generator
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct FakeGenerator {
    response: Option<String>,
    calls: Mutex<Vec<(String, String, GenerationParams)>>,
}

impl FakeGenerator {
    pub(crate) fn returning(text: &str) -> Self {
        Self {
            response: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            response: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(system_prompt, user_prompt, params)` triples.
    pub(crate) fn calls(&self) -> Vec<(String, String, GenerationParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        params: GenerationParams,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((
            system_prompt.to_string(),
            user_prompt.to_string(),
            params,
        ));
        self.response.clone().ok_or(LlmError::EmptyContent)
    }
}
