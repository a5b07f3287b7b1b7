use serde::Serialize;

/// Account profile as resolved by an ingest source.
///
/// Discarded after one response; the formatter substitutes a deterministic
/// fallback image when `display_image_url` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub handle: String,
    pub display_image_url: Option<String>,
}

/// A post in the common normalized shape every ingest source produces.
///
/// All fields are always present: missing upstream data becomes the
/// documented default (0 for counts, empty string for text/timestamp,
/// `None` for media), so downstream stages never special-case provider
/// origin. `id` stays a string to avoid precision loss on 64-bit
/// provider-native identifiers. `created_at` keeps the provider's original
/// timestamp format; rendering it is a presentation concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    pub view_count: u64,
    pub created_at: String,
    pub media_url: Option<String>,
}

/// A formatted output row with its 1-based rank, in the exact field names
/// the front end consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPost {
    pub rank: usize,
    pub id: String,
    pub text: String,
    pub likes: u64,
    pub retweets: u64,
    pub replies: u64,
    pub views: u64,
    pub created_at: String,
    pub media: Option<String>,
    pub link: String,
}

/// Terminal success payload, serialized directly to the response boundary.
///
/// `top_posts` is present only in top-N output mode. `total_count` is the
/// number of keyword matches before top-N truncation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupPayload {
    pub error: bool,
    pub username: String,
    #[serde(rename = "pfpUrl")]
    pub pfp_url: String,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
    #[serde(rename = "bestPost")]
    pub best_post: RankedPost,
    #[serde(rename = "topPosts", skip_serializing_if = "Option::is_none")]
    pub top_posts: Option<Vec<RankedPost>>,
}
