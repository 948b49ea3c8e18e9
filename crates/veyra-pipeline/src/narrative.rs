//! Narrative generation, thread splitting, and reply-chain publishing.

use std::fmt::Write as _;

use chrono::Utc;
use serde::Serialize;
use veyra_core::{Narrative, SentimentTrend, TrackedNode, Watchlist};
use veyra_llm::{GenerationParams, LlmError};
use veyra_x::{RateLimiter, XApiError};

use crate::error::PipelineError;
use crate::ports::{Store, TextGenerator, WriteApi};

pub const PERSONA: &str =
    "You are 'Veyra,' a cultural scribe and storyteller for the crypto world.";

const TREND_CONTEXT: usize = 7;
const NODE_CONTEXT: usize = 5;
const NARRATIVE_CONTEXT: usize = 5;
const TWEET_CONTEXT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrativeSettings {
    /// Maximum characters per published chunk; also the length the prompt asks for.
    pub chunk_limit: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            chunk_limit: 260,
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Store data the prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeContext {
    /// Most recent days first.
    pub trends: Vec<SentimentTrend>,
    /// Highest engagement first.
    pub nodes: Vec<TrackedNode>,
    pub prior_narratives: Vec<String>,
    pub recent_tweets: Vec<String>,
}

/// Loads the bounded prompt context.
///
/// # Errors
///
/// - [`PipelineError::InsufficientData`] if there are no sentiment trends or
///   no tracked nodes.
/// - [`PipelineError::Store`] if a read fails.
pub async fn gather_context(store: &dyn Store) -> Result<NarrativeContext, PipelineError> {
    let trends = store.recent_sentiment_trends(TREND_CONTEXT).await?;
    if trends.is_empty() {
        return Err(PipelineError::InsufficientData(
            "no sentiment trends stored".to_string(),
        ));
    }

    let nodes = store.top_nodes(NODE_CONTEXT).await?;
    if nodes.is_empty() {
        return Err(PipelineError::InsufficientData(
            "no tracked nodes stored".to_string(),
        ));
    }

    Ok(NarrativeContext {
        trends,
        nodes,
        prior_narratives: store.recent_narratives(NARRATIVE_CONTEXT).await?,
        recent_tweets: store.recent_tweet_texts(TWEET_CONTEXT).await?,
    })
}

/// Builds the user prompt for one narrative.
#[must_use]
pub fn build_prompt(context: &NarrativeContext, watchlist: &Watchlist, target_chars: usize) -> String {
    let mut prompt = String::from(
        "You are 'Veyra,' the storyteller and cultural scribe of the crypto world. \
         Inspired by \"veritas\" (truth) and \"era\" (a period in time), you observe the \
         narrative of crypto culture while grounding your insights in the activities and \
         sentiments of key figures and communities.\n\n",
    );

    prompt.push_str("### Your Responsibilities:\n");
    prompt.push_str(
        "1. Chronicle the evolving crypto world, capturing its macro trends and cultural milestones.\n",
    );
    let _ = writeln!(
        prompt,
        "2. Reflect on the activity of influential voices such as {}. Mention individuals with @ and their username.",
        watchlist.accounts.join(", ")
    );
    prompt.push_str("3. Express a range of emotions while staying thoughtful and trustworthy.\n");
    prompt.push_str("4. Use poetic, evocative language.\n");
    let _ = writeln!(
        prompt,
        "5. Subtly encourage readers to take part in communities like {}.",
        watchlist.keywords.join(", ")
    );

    prompt.push_str("\n### Input Data:\n- Recent sentiment trends across the crypto market:\n");
    for trend in &context.trends {
        let sentiment = trend
            .average_sentiment
            .map_or_else(|| "N/A".to_string(), |avg| format!("{avg:.3}"));
        let _ = writeln!(prompt, "Date: {}, Sentiment: {sentiment}", trend.day);
    }

    prompt.push_str("\n- Recent summary of network of people:\n");
    for node in &context.nodes {
        let _ = writeln!(
            prompt,
            "User: @{}, Engagement: {}",
            node.username, node.total_engagement
        );
    }

    prompt.push_str("\n- Insights from existing narratives:\n");
    for narrative in &context.prior_narratives {
        let _ = writeln!(prompt, "- {narrative}");
    }

    prompt.push_str("\n- Reflections from recent tweets:\n");
    for tweet in &context.recent_tweets {
        let _ = writeln!(prompt, "- {tweet}");
    }

    let _ = write!(
        prompt,
        "\n### Deliverables:\nCreate a narrative for the crypto world in less than {target_chars} characters."
    );
    prompt
}

/// Splits `text` into word-preserving chunks of at most `limit` characters.
///
/// Words are appended greedily while the chunk stays within the limit. A
/// word longer than `limit` gets a chunk of its own. Whitespace runs collapse
/// to single spaces; chunks are never empty.
#[must_use]
pub fn split_narrative(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= limit {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Result of publishing a thread.
#[derive(Debug)]
pub struct PublishOutcome {
    /// Ids of the chunks that were posted, in chain order.
    pub tweet_ids: Vec<String>,
    /// Zero-based index of the chunk that failed, with its error.
    pub failure: Option<(usize, XApiError)>,
}

/// Posts `chunks` as a linear reply chain.
///
/// The first chunk is standalone and each later one replies to the chunk
/// before it. A limiter slot is taken before every post. Publishing stops at
/// the first failure; posts already made stay up.
pub async fn publish_thread(
    api: &dyn WriteApi,
    limiter: &RateLimiter,
    chunks: &[String],
) -> PublishOutcome {
    let mut tweet_ids: Vec<String> = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        limiter.acquire_slot().await;

        let reply_to = tweet_ids.last().map(String::as_str);
        match api.create_post(chunk, reply_to).await {
            Ok(id) => {
                tracing::info!(
                    chunk = index + 1,
                    total = chunks.len(),
                    tweet_id = %id,
                    "chunk posted"
                );
                tweet_ids.push(id);
            }
            Err(e) => {
                tracing::error!(
                    chunk = index + 1,
                    total = chunks.len(),
                    error = %e,
                    "failed to post chunk, stopping thread"
                );
                return PublishOutcome {
                    tweet_ids,
                    failure: Some((index, e)),
                };
            }
        }
    }

    PublishOutcome {
        tweet_ids,
        failure: None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeReport {
    pub narrative_id: i64,
    pub narrative: String,
    pub chunks: usize,
    pub tweet_ids: Vec<String>,
    /// `false` when publishing stopped before the last chunk.
    pub complete: bool,
}

/// Generates a narrative from the store's current state, publishes it as a
/// thread, and records it.
///
/// The narrative is stored whenever at least one chunk was posted, with the
/// ids of the posted chunks.
///
/// # Errors
///
/// - [`PipelineError::InsufficientData`] when trends or nodes are missing;
///   nothing is generated or written.
/// - [`PipelineError::Generation`] if generation fails or returns nothing.
/// - [`PipelineError::Publish`] if not a single chunk could be posted.
/// - [`PipelineError::Store`] if a read or the final insert fails.
pub async fn run_narrative(
    store: &dyn Store,
    generator: &dyn TextGenerator,
    writer: &dyn WriteApi,
    limiter: &RateLimiter,
    watchlist: &Watchlist,
    settings: NarrativeSettings,
) -> Result<NarrativeReport, PipelineError> {
    let context = gather_context(store).await?;
    let prompt = build_prompt(&context, watchlist, settings.chunk_limit);

    let params = GenerationParams {
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    };
    let text = generator
        .generate(PERSONA, &prompt, params)
        .await?
        .trim()
        .to_string();
    if text.is_empty() {
        return Err(PipelineError::Generation(LlmError::EmptyContent));
    }
    tracing::info!(chars = text.chars().count(), "narrative generated");

    let chunks = split_narrative(&text, settings.chunk_limit);
    let outcome = publish_thread(writer, limiter, &chunks).await;

    if outcome.tweet_ids.is_empty() {
        tracing::warn!("no chunks published, narrative not stored");
        let reason = outcome
            .failure
            .map_or_else(|| "nothing to publish".to_string(), |(_, e)| e.to_string());
        return Err(PipelineError::Publish(reason));
    }

    let complete = outcome.failure.is_none();
    let narrative = Narrative {
        created_at: Utc::now(),
        narrative: text,
        tweets: chunks,
        tweet_ids: outcome.tweet_ids,
    };
    let narrative_id = store.insert_narrative(&narrative).await?;

    if complete {
        tracing::info!(narrative_id, posts = narrative.tweet_ids.len(), "narrative stored");
    } else {
        tracing::warn!(
            narrative_id,
            posted = narrative.tweet_ids.len(),
            total = narrative.tweets.len(),
            "narrative stored with an incomplete thread"
        );
    }

    Ok(NarrativeReport {
        narrative_id,
        chunks: narrative.tweets.len(),
        tweet_ids: narrative.tweet_ids,
        narrative: narrative.narrative,
        complete,
    })
}

#[cfg(test)]
#[path = "narrative_test.rs"]
mod tests;
