//! Engagement ranking.

use std::cmp::Reverse;

use crate::types::Post;

/// Engagement score: likes + reposts + replies.
///
/// View counts are informational only and must never influence ranking.
#[must_use]
pub fn engagement_score(post: &Post) -> u64 {
    post.like_count + post.repost_count + post.reply_count
}

/// Order posts descending by engagement score.
///
/// The sort is stable, so posts with equal scores keep their relative input
/// order. Sources deliver most-recent-first, which makes ties favor recency.
#[must_use]
pub fn rank_posts(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by_key(|p| Reverse(engagement_score(p)));
    posts
}

/// Take the first `n` ranked posts, or fewer if the input is shorter.
#[must_use]
pub fn select_top_n(mut ranked: Vec<Post>, n: usize) -> Vec<Post> {
    ranked.truncate(n);
    ranked
}
