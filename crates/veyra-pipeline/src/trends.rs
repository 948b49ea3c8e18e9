//! Daily sentiment aggregation.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::Serialize;
use veyra_core::{types::day_key, DailyTrend, SentimentTrend, TweetSentiment};

use crate::error::PipelineError;
use crate::hashtags::{extract_trending_hashtags, HashtagCount};
use crate::ports::Store;

pub const DEFAULT_HASHTAG_LIMIT: usize = 10;

/// Groups tweets by UTC creation day.
///
/// `total_tweets` counts every tweet of the day. `average_sentiment` is the
/// mean over the scored ones only, and `None` if none are scored yet.
/// Output is ascending by day.
#[must_use]
pub fn aggregate_daily(tweets: &[TweetSentiment]) -> Vec<DailyTrend> {
    #[derive(Default)]
    struct Acc {
        total: i64,
        scored: u32,
        sum: f64,
    }

    let mut days: BTreeMap<String, Acc> = BTreeMap::new();
    for tweet in tweets {
        let acc = days.entry(day_key(&tweet.created_at)).or_default();
        acc.total += 1;
        if let Some(score) = tweet.sentiment_score {
            acc.scored += 1;
            acc.sum += score;
        }
    }

    days.into_iter()
        .map(|(day, acc)| DailyTrend {
            day,
            average_sentiment: (acc.scored > 0).then(|| acc.sum / f64::from(acc.scored)),
            total_tweets: acc.total,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendsReport {
    pub days: Vec<DailyTrend>,
    pub trending_hashtags: Vec<HashtagCount>,
}

/// Recomputes every day's trend from the stored tweets and upserts one
/// record per day, then ranks the top hashtags.
///
/// Re-running with unchanged tweets leaves the same records behind.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if reading tweets or any upsert fails.
pub async fn run_trends(
    store: &dyn Store,
    hashtag_limit: usize,
) -> Result<TrendsReport, PipelineError> {
    let sentiments = store.tweet_sentiments().await?;
    let days = aggregate_daily(&sentiments);

    for day in &days {
        let trend = SentimentTrend {
            day: day.day.clone(),
            average_sentiment: day.average_sentiment,
            total_tweets: day.total_tweets,
            updated_at: Utc::now(),
        };
        store.upsert_sentiment_trend(&trend).await?;
        tracing::info!(
            day = %trend.day,
            average_sentiment = ?trend.average_sentiment,
            total_tweets = trend.total_tweets,
            "sentiment trend upserted"
        );
    }

    let contents = store.tweet_contents().await?;
    let trending_hashtags =
        extract_trending_hashtags(contents.iter().map(String::as_str), hashtag_limit);
    if !trending_hashtags.is_empty() {
        let top: Vec<&str> = trending_hashtags.iter().map(|h| h.tag.as_str()).collect();
        tracing::info!(hashtags = ?top, "trending hashtags");
    }

    Ok(TrendsReport {
        days,
        trending_hashtags,
    })
}
