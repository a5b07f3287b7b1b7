//! Reseller search API source (single combined query strategy).
//!
//! One `advanced_search` call with a `from:{handle}` query returns tweets
//! with the author embedded, so no separate profile lookup is needed. A
//! valid query over an unknown handle just returns zero tweets; search
//! cannot distinguish "no account" from "no posts", so an empty result
//! flows through to the relevance filter rather than failing here.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use super::{build_http_client, status_failure};
use crate::error::LookupError;
use crate::types::{Account, Post};

const DEFAULT_BASE_URL: &str = "https://api.twitterapi.io";

pub struct ResellerClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    tweets: Vec<ResellerTweet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResellerTweet {
    id: String,
    text: Option<String>,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    reply_count: u64,
    #[serde(default)]
    view_count: u64,
    created_at: Option<String>,
    author: Option<ResellerAuthor>,
    extended_entities: Option<ResellerEntities>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResellerAuthor {
    profile_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResellerEntities {
    media: Option<Vec<ResellerMedia>>,
}

#[derive(Debug, Deserialize)]
struct ResellerMedia {
    media_url_https: Option<String>,
}

impl ResellerClient {
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

    /// Fetch recent posts for the handle with one search query.
    ///
    /// The account avatar is lifted from the first tweet's embedded author;
    /// with zero tweets the account carries no image and the formatter's
    /// fallback applies.
    ///
    /// # Errors
    ///
    /// - [`LookupError::QuotaExceeded`] on 402.
    /// - [`LookupError::RateLimited`] on 429.
    /// - [`LookupError::UpstreamError`] on any other non-success status.
    /// - [`LookupError::Http`] / [`LookupError::Deserialize`] on transport
    ///   or shape failures.
    pub async fn fetch_account_and_posts(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<(Account, Vec<Post>), LookupError> {
        let query = format!("from:{handle}");
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/twitter/tweet/advanced_search?query={encoded}&queryType=Latest",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_failure(handle, status));
        }

        let body = response.text().await?;
        let envelope: SearchEnvelope =
            serde_json::from_str(&body).map_err(|source| LookupError::Deserialize {
                context: format!("search results for @{handle}"),
                source,
            })?;

        let display_image_url = envelope
            .tweets
            .first()
            .and_then(|t| t.author.as_ref())
            .and_then(|a| a.profile_picture.clone());

        let mut posts: Vec<Post> = envelope.tweets.into_iter().map(normalize_tweet).collect();
        posts.truncate(limit);

        let account = Account {
            handle: handle.to_string(),
            display_image_url,
        };
        Ok((account, posts))
    }
}

fn normalize_tweet(raw: ResellerTweet) -> Post {
    let media_url = raw
        .extended_entities
        .and_then(|e| e.media)
        .and_then(|m| m.into_iter().next())
        .and_then(|m| m.media_url_https);

    Post {
        id: raw.id,
        text: raw.text.unwrap_or_default(),
        like_count: raw.like_count,
        repost_count: raw.retweet_count,
        reply_count: raw.reply_count,
        view_count: raw.view_count,
        created_at: raw.created_at.unwrap_or_default(),
        media_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_camel_case_tweet() {
        let raw: ResellerTweet = serde_json::from_str(
            r#"{
                "id": "777",
                "text": "reseller post",
                "likeCount": 4,
                "retweetCount": 1,
                "replyCount": 2,
                "viewCount": 88,
                "createdAt": "Sat Nov 02 10:00:00 +0000 2024",
                "author": { "userName": "tester", "profilePicture": "https://cdn/pic.jpg" }
            }"#,
        )
        .unwrap();
        let post = normalize_tweet(raw);
        assert_eq!(post.id, "777");
        assert_eq!(post.like_count, 4);
        assert_eq!(post.repost_count, 1);
        assert_eq!(post.reply_count, 2);
        assert_eq!(post.view_count, 88);
        assert_eq!(post.created_at, "Sat Nov 02 10:00:00 +0000 2024");
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let raw: ResellerTweet =
            serde_json::from_str(r#"{ "id": "1", "text": "bare" }"#).unwrap();
        let post = normalize_tweet(raw);
        assert_eq!(post.like_count, 0);
        assert_eq!(post.view_count, 0);
    }

    #[test]
    fn media_taken_from_extended_entities() {
        let raw: ResellerTweet = serde_json::from_str(
            r#"{
                "id": "1",
                "text": "with media",
                "extendedEntities": { "media": [ { "media_url_https": "https://img/a.jpg" } ] }
            }"#,
        )
        .unwrap();
        assert_eq!(
            normalize_tweet(raw).media_url.as_deref(),
            Some("https://img/a.jpg")
        );
    }
}
