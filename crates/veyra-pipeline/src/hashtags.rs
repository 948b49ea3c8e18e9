use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagCount {
    pub tag: String,
    pub count: usize,
}

/// The `limit` most frequent hashtags across `texts`.
///
/// A hashtag is a whitespace-separated token starting with `#`; trailing
/// punctuation is dropped and tags are compared lowercased. Ordered by count
/// descending, then alphabetically.
pub fn extract_trending_hashtags<'a, I>(texts: I, limit: usize) -> Vec<HashtagCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        for token in text.split_whitespace() {
            let Some(body) = token.strip_prefix('#') else {
                continue;
            };
            let body = body.trim_end_matches(|c: char| !c.is_alphanumeric() && c != '_');
            if body.is_empty() || body.starts_with('#') {
                continue;
            }
            *counts.entry(format!("#{}", body.to_lowercase())).or_default() += 1;
        }
    }

    let mut ranked: Vec<HashtagCount> = counts
        .into_iter()
        .map(|(tag, count)| HashtagCount { tag, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(limit);
    ranked
}
