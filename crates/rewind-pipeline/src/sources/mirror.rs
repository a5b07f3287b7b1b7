//! Scraping mirror network source (RSS, fallback list strategy).
//!
//! Mirrors are redundant instances of the same feed frontend with uneven
//! availability, so they are probed in a fixed priority order: any
//! non-success, timeout, or parse failure just advances to the next one.
//! Feeds carry no engagement counts; those normalize to 0 and downstream
//! stages never special-case it.

use super::mirror_feed::{parse_mirror_feed, FeedItem};
use crate::error::LookupError;
use crate::types::{Account, Post};

/// Client for an ordered list of mirror base URLs.
///
/// The list is injected at construction so tests can point it at mock
/// servers; the per-attempt timeout bounds the whole probe sequence.
pub struct MirrorClient {
    client: reqwest::Client,
    mirrors: Vec<String>,
}

impl MirrorClient {
    /// Creates a client probing `mirrors` in order, each attempt bounded by
    /// `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(mirrors: Vec<String>, timeout_secs: u64) -> Result<Self, LookupError> {
        Ok(Self {
            client: super::build_http_client(timeout_secs)?,
            mirrors,
        })
    }

    /// Fetch the account feed from the first mirror that answers.
    ///
    /// # Errors
    ///
    /// - [`LookupError::AccountNotFound`] on a mirror 404 — a mirror that
    ///   answers authoritatively says the account does not exist, so the
    ///   probe stops there.
    /// - [`LookupError::AllMirrorsExhausted`] when every mirror failed,
    ///   timed out, or served an unparseable feed.
    pub async fn fetch_account_and_posts(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<(Account, Vec<Post>), LookupError> {
        for (index, base) in self.mirrors.iter().enumerate() {
            let url = format!("{}/{handle}/rss", base.trim_end_matches('/'));

            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        handle,
                        mirror = %base,
                        attempt = index + 1,
                        error = %e,
                        "mirror unreachable, trying next"
                    );
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 404 {
                return Err(LookupError::AccountNotFound(handle.to_string()));
            }
            if !status.is_success() {
                tracing::warn!(
                    handle,
                    mirror = %base,
                    attempt = index + 1,
                    status = status.as_u16(),
                    "mirror returned non-success, trying next"
                );
                continue;
            }

            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(handle, mirror = %base, error = %e, "mirror body read failed");
                    continue;
                }
            };

            let feed = match parse_mirror_feed(&body) {
                Ok(feed) => feed,
                Err(e) => {
                    tracing::warn!(handle, mirror = %base, error = %e, "mirror feed unparseable");
                    continue;
                }
            };

            tracing::debug!(
                handle,
                mirror = %base,
                items = feed.items.len(),
                "mirror feed fetched"
            );

            let mut posts: Vec<Post> = feed
                .items
                .into_iter()
                .filter_map(normalize_item)
                .collect();
            posts.truncate(limit);

            let account = Account {
                handle: handle.to_string(),
                display_image_url: feed.image_url,
            };
            return Ok((account, posts));
        }

        Err(LookupError::AllMirrorsExhausted {
            attempted: self.mirrors.len(),
        })
    }
}

/// Normalize one feed item into the common [`Post`] shape.
///
/// The post id is the last `/status/` path segment of the item link
/// (fragment stripped); items whose link carries no status id are dropped.
/// Description text is preferred over the title, which mirrors truncate.
fn normalize_item(item: FeedItem) -> Option<Post> {
    let id = status_id_from_link(&item.link)?;
    let text = if item.description.is_empty() {
        item.title
    } else {
        item.description
    };
    Some(Post {
        id,
        text,
        like_count: 0,
        repost_count: 0,
        reply_count: 0,
        view_count: 0,
        created_at: item.pub_date,
        media_url: None,
    })
}

fn status_id_from_link(link: &str) -> Option<String> {
    let (_, rest) = link.split_once("/status/")?;
    let id: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
