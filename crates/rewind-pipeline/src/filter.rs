//! Keyword relevance filter.

use crate::types::Post;

/// A case-insensitive keyword set for substring matching.
///
/// Matching is plain substring containment, not word-boundary aware: a
/// keyword embedded in a longer word still matches. That behavior is load
/// bearing for compatibility with the existing front end and must not be
/// tightened.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Build a set from raw keywords, lowercasing and dropping empties.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Whether `text` contains any keyword, case-insensitively.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Keep posts whose text matches any keyword, preserving input order.
#[must_use]
pub fn filter_posts(posts: Vec<Post>, keywords: &KeywordSet) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|p| keywords.matches(&p.text))
        .collect()
}
