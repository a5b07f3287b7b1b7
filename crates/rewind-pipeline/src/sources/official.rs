//! Official platform API v2 source (two-step strategy).
//!
//! The v2 API reports a missing user inside a 200 envelope (`errors[]` with
//! no `data`), so "not found" is detected from the body as well as from the
//! HTTP status. Engagement counts live under `public_metrics`; media is
//! delivered out-of-line in `includes.media` keyed by `media_keys`.

use serde::Deserialize;

use super::{build_http_client, status_failure};
use crate::error::LookupError;
use crate::types::{Account, Post};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// v2 caps `max_results` to this range; values outside are rejected with 400.
const MAX_RESULTS_MIN: usize = 5;
const MAX_RESULTS_MAX: usize = 100;

pub struct OfficialClient {
    client: reqwest::Client,
    bearer_token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    data: Option<UserData>,
    errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    profile_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimelineEnvelope {
    data: Option<Vec<TweetV2>>,
    includes: Option<Includes>,
}

#[derive(Debug, Deserialize)]
struct TweetV2 {
    id: String,
    text: String,
    created_at: Option<String>,
    public_metrics: Option<PublicMetrics>,
    attachments: Option<Attachments>,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
    #[serde(default)]
    impression_count: u64,
}

#[derive(Debug, Deserialize)]
struct Attachments {
    media_keys: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    media: Option<Vec<MediaV2>>,
}

#[derive(Debug, Deserialize)]
struct MediaV2 {
    media_key: String,
    url: Option<String>,
    preview_image_url: Option<String>,
}

impl OfficialClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(bearer_token: &str, timeout_secs: u64) -> Result<Self, LookupError> {
        Self::with_base_url(bearer_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        bearer_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LookupError> {
        Ok(Self {
            client: build_http_client(timeout_secs)?,
            bearer_token: bearer_token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Resolve the handle and fetch its recent timeline.
    ///
    /// # Errors
    ///
    /// - [`LookupError::AccountNotFound`] on a 404 or an in-envelope user
    ///   error with no data.
    /// - [`LookupError::RateLimited`] on 429.
    /// - [`LookupError::UpstreamError`] on any other non-success status.
    /// - [`LookupError::Http`] / [`LookupError::Deserialize`] on transport
    ///   or shape failures.
    pub async fn fetch_account_and_posts(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<(Account, Vec<Post>), LookupError> {
        let user = self.fetch_user(handle).await?;
        tracing::debug!(handle, user_id = %user.id, "resolved v2 user");

        let envelope = self.fetch_timeline(handle, &user.id, limit).await?;
        let includes = envelope.includes.unwrap_or_default();
        let mut posts: Vec<Post> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|t| normalize_v2_tweet(t, &includes))
            .collect();
        posts.truncate(limit);

        let account = Account {
            handle: handle.to_string(),
            display_image_url: user.profile_image_url,
        };
        Ok((account, posts))
    }

    async fn fetch_user(&self, handle: &str) -> Result<UserData, LookupError> {
        let url = format!(
            "{}/2/users/by/username/{handle}?user.fields=profile_image_url",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(handle, status));
        }

        let body = response.text().await?;
        let envelope: UserEnvelope =
            serde_json::from_str(&body).map_err(|source| LookupError::Deserialize {
                context: format!("v2 user lookup for @{handle}"),
                source,
            })?;

        match envelope.data {
            Some(user) => Ok(user),
            None => {
                if let Some(errors) = &envelope.errors {
                    tracing::debug!(handle, errors = errors.len(), "v2 user lookup errored");
                }
                Err(LookupError::AccountNotFound(handle.to_string()))
            }
        }
    }

    async fn fetch_timeline(
        &self,
        handle: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<TimelineEnvelope, LookupError> {
        let max_results = limit.clamp(MAX_RESULTS_MIN, MAX_RESULTS_MAX);
        let url = format!(
            "{}/2/users/{user_id}/tweets?max_results={max_results}\
             &tweet.fields=public_metrics,created_at,attachments\
             &expansions=attachments.media_keys&media.fields=url,preview_image_url",
            self.base_url
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The user already resolved, so a timeline 404 is an upstream
            // inconsistency rather than a missing account.
            if status.as_u16() == 404 {
                return Err(LookupError::UpstreamError { status: 404 });
            }
            return Err(status_failure(handle, status));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| LookupError::Deserialize {
            context: format!("v2 timeline for @{handle}"),
            source,
        })
    }
}

/// Normalize one v2 tweet, resolving the first attached media key against
/// the out-of-line `includes.media` list (`url` preferred over
/// `preview_image_url`).
fn normalize_v2_tweet(tweet: TweetV2, includes: &Includes) -> Post {
    let media_url = tweet
        .attachments
        .as_ref()
        .and_then(|a| a.media_keys.as_ref())
        .and_then(|keys| keys.first())
        .and_then(|key| {
            includes
                .media
                .as_ref()
                .and_then(|media| media.iter().find(|m| &m.media_key == key))
        })
        .and_then(|m| m.url.clone().or_else(|| m.preview_image_url.clone()));

    let metrics = tweet.public_metrics.unwrap_or_default();
    Post {
        id: tweet.id,
        text: tweet.text,
        like_count: metrics.like_count,
        repost_count: metrics.retweet_count,
        reply_count: metrics.reply_count,
        view_count: metrics.impression_count,
        created_at: tweet.created_at.unwrap_or_default(),
        media_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_public_metrics() {
        let tweet: TweetV2 = serde_json::from_str(
            r#"{
                "id": "42",
                "text": "metrics test",
                "created_at": "2024-06-01T12:00:00.000Z",
                "public_metrics": {
                    "like_count": 7,
                    "retweet_count": 3,
                    "reply_count": 2,
                    "impression_count": 9001
                }
            }"#,
        )
        .unwrap();
        let post = normalize_v2_tweet(tweet, &Includes::default());
        assert_eq!(post.like_count, 7);
        assert_eq!(post.repost_count, 3);
        assert_eq!(post.reply_count, 2);
        assert_eq!(post.view_count, 9001);
        assert_eq!(post.created_at, "2024-06-01T12:00:00.000Z");
    }

    #[test]
    fn normalize_defaults_missing_metrics_to_zero() {
        let tweet: TweetV2 =
            serde_json::from_str(r#"{ "id": "1", "text": "bare" }"#).unwrap();
        let post = normalize_v2_tweet(tweet, &Includes::default());
        assert_eq!(post.like_count, 0);
        assert_eq!(post.view_count, 0);
        assert!(post.created_at.is_empty());
    }

    #[test]
    fn normalize_resolves_media_key_from_includes() {
        let tweet: TweetV2 = serde_json::from_str(
            r#"{
                "id": "1",
                "text": "with media",
                "attachments": { "media_keys": ["3_111"] }
            }"#,
        )
        .unwrap();
        let includes: Includes = serde_json::from_str(
            r#"{
                "media": [
                    { "media_key": "3_000", "url": "https://img/other.jpg" },
                    { "media_key": "3_111", "preview_image_url": "https://img/preview.jpg" }
                ]
            }"#,
        )
        .unwrap();
        let post = normalize_v2_tweet(tweet, &includes);
        assert_eq!(post.media_url.as_deref(), Some("https://img/preview.jpg"));
    }

    #[test]
    fn normalize_leaves_media_absent_without_includes_match() {
        let tweet: TweetV2 = serde_json::from_str(
            r#"{
                "id": "1",
                "text": "dangling key",
                "attachments": { "media_keys": ["3_999"] }
            }"#,
        )
        .unwrap();
        let post = normalize_v2_tweet(tweet, &Includes::default());
        assert!(post.media_url.is_none());
    }
}
