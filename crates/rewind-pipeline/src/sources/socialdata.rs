//! Paid aggregation API source (two-step strategy).
//!
//! Step one resolves the handle to the provider-native numeric id and the
//! profile image; step two pulls the recent timeline by id. Raw tweets use
//! legacy field names with several historical aliases, normalized here with
//! an explicit precedence order.

use serde::Deserialize;

use super::{build_http_client, status_failure};
use crate::error::LookupError;
use crate::types::{Account, Post};

const DEFAULT_BASE_URL: &str = "https://api.socialdata.tools";

/// Client for the paid aggregation API.
///
/// Use [`SocialDataClient::new`] for production or
/// [`SocialDataClient::with_base_url`] to point at a mock server in tests.
pub struct SocialDataClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    id_str: Option<String>,
    id: Option<u64>,
    profile_image_url_https: Option<String>,
    profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTimeline {
    tweets: Option<Vec<RawTweet>>,
    data: Option<Vec<RawTweet>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTweet {
    id_str: Option<String>,
    id: Option<u64>,
    full_text: Option<String>,
    text: Option<String>,
    favorite_count: Option<u64>,
    retweet_count: Option<u64>,
    reply_count: Option<u64>,
    views_count: Option<u64>,
    view_count: Option<u64>,
    tweet_created_at: Option<String>,
    created_at: Option<String>,
    entities: Option<RawEntities>,
    extended_entities: Option<RawEntities>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEntities {
    media: Option<Vec<RawMedia>>,
}

#[derive(Debug, Deserialize)]
struct RawMedia {
    media_url_https: Option<String>,
}

impl SocialDataClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, LookupError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Resolve the handle and fetch its recent timeline.
    ///
    /// # Errors
    ///
    /// - [`LookupError::AccountNotFound`] on a profile 404.
    /// - [`LookupError::QuotaExceeded`] on a 402 from either step.
    /// - [`LookupError::RateLimited`] on a 429 from either step.
    /// - [`LookupError::UpstreamError`] on any other non-success status.
    /// - [`LookupError::Http`] / [`LookupError::Deserialize`] on transport
    ///   or shape failures.
    pub async fn fetch_account_and_posts(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<(Account, Vec<Post>), LookupError> {
        let profile = self.fetch_profile(handle).await?;
        let user_id = profile
            .id_str
            .clone()
            .or_else(|| profile.id.map(|id| id.to_string()))
            .ok_or_else(|| {
                LookupError::Normalization(format!("profile for @{handle} carried no id"))
            })?;
        tracing::debug!(handle, user_id = %user_id, "resolved profile");

        let raw = self.fetch_timeline(handle, &user_id).await?;
        let mut posts: Vec<Post> = raw.into_iter().map(normalize_tweet).collect();
        posts.truncate(limit);

        let account = Account {
            handle: handle.to_string(),
            display_image_url: profile
                .profile_image_url_https
                .or(profile.profile_image_url),
        };
        Ok((account, posts))
    }

    async fn fetch_profile(&self, handle: &str) -> Result<RawProfile, LookupError> {
        let url = format!("{}/twitter/user/{handle}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(handle, status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| LookupError::Deserialize {
            context: format!("profile for @{handle}"),
            source,
        })
    }

    async fn fetch_timeline(&self, handle: &str, user_id: &str) -> Result<Vec<RawTweet>, LookupError> {
        let url = format!("{}/twitter/user/{user_id}/tweets-and-replies", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // A timeline 404 after a successful profile lookup is an
            // upstream inconsistency, not a missing account.
            if status.as_u16() == 404 {
                return Err(LookupError::UpstreamError { status: 404 });
            }
            return Err(status_failure(handle, status));
        }

        let body = response.text().await?;
        let timeline: RawTimeline =
            serde_json::from_str(&body).map_err(|source| LookupError::Deserialize {
                context: format!("timeline for @{handle}"),
                source,
            })?;
        Ok(timeline.tweets.or(timeline.data).unwrap_or_default())
    }
}

/// Normalize one raw tweet into the common [`Post`] shape.
///
/// Precedence:
/// - id: `id_str`, else numeric `id` stringified, else empty
/// - text: `full_text`, else `text`, else empty
/// - timestamp: `tweet_created_at`, else `created_at`, else empty
/// - media: first `entities.media[].media_url_https`, else first
///   `extended_entities.media[].media_url_https`
/// - counts: 0 when absent (`views_count` preferred over `view_count`)
fn normalize_tweet(raw: RawTweet) -> Post {
    let first_media = |entities: Option<RawEntities>| {
        entities
            .and_then(|e| e.media)
            .and_then(|m| m.into_iter().next())
            .and_then(|m| m.media_url_https)
    };
    let media_url = first_media(raw.entities).or_else(|| first_media(raw.extended_entities));

    Post {
        id: raw
            .id_str
            .or_else(|| raw.id.map(|id| id.to_string()))
            .unwrap_or_default(),
        text: raw.full_text.or(raw.text).unwrap_or_default(),
        like_count: raw.favorite_count.unwrap_or(0),
        repost_count: raw.retweet_count.unwrap_or(0),
        reply_count: raw.reply_count.unwrap_or(0),
        view_count: raw.views_count.or(raw.view_count).unwrap_or(0),
        created_at: raw.tweet_created_at.or(raw.created_at).unwrap_or_default(),
        media_url,
    }
}
