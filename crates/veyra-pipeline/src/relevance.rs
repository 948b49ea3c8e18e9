/// Keyword-substring predicate deciding whether a post is stored.
///
/// Matching is case-insensitive and a single hit is enough. An empty keyword
/// list matches nothing.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
}

impl RelevanceFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        keywords.sort();
        keywords.dedup();
        Self { keywords }
    }

    #[must_use]
    pub fn is_relevant(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RelevanceFilter {
        RelevanceFilter::new(["Bonk", "$Abble", "dog wif hat"])
    }

    #[test]
    fn matches_case_insensitively() {
        assert!(filter().is_relevant("BONK is back"));
        assert!(filter().is_relevant("buying more $abble today"));
    }

    #[test]
    fn matches_substrings_inside_words() {
        assert!(filter().is_relevant("#letsbonk"));
    }

    #[test]
    fn matches_multi_word_keywords() {
        assert!(filter().is_relevant("the Dog Wif Hat meta"));
        assert!(!filter().is_relevant("dog with hat"));
    }

    #[test]
    fn empty_text_is_not_relevant() {
        assert!(!filter().is_relevant(""));
    }

    #[test]
    fn unrelated_text_is_not_relevant() {
        assert!(!filter().is_relevant("weather is nice"));
    }

    #[test]
    fn empty_keyword_list_matches_nothing() {
        let filter = RelevanceFilter::new(Vec::<String>::new());
        assert!(!filter.is_relevant("bonk"));
    }

    #[test]
    fn blank_keywords_are_dropped() {
        let filter = RelevanceFilter::new(["", "bonk", "BONK"]);
        assert_eq!(filter.keywords(), ["bonk"]);
    }
}
