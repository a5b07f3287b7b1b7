//! Lookup pipeline orchestration.

use rewind_core::AppConfig;

use crate::error::LookupError;
use crate::filter::{filter_posts, KeywordSet};
use crate::format::format_result;
use crate::rank::rank_posts;
use crate::sources::fetch_account_and_posts;
use crate::types::LookupPayload;

/// Run the full lookup pipeline for one handle.
///
/// Stages run strictly in sequence, each consuming its predecessor's output:
///
/// 1. Fetch the account profile and recent posts from the configured
///    provider.
/// 2. Keep posts matching the configured keyword set.
/// 3. Rank by engagement score, stable on ties.
/// 4. Format the winners into the front-end payload.
///
/// Any stage failure short-circuits the rest; no partial results are ever
/// returned. Re-running against unchanged provider output yields an
/// identical payload.
///
/// # Errors
///
/// Returns [`LookupError::MissingHandle`] for a blank handle before any
/// upstream call, [`LookupError::NoMatchingContent`] when no post matches
/// the keyword set, and the ingest-stage taxonomy (`AccountNotFound`,
/// `QuotaExceeded`, `RateLimited`, `UpstreamError`, `AllMirrorsExhausted`,
/// transport/parse errors) otherwise.
pub async fn run_lookup(config: &AppConfig, handle: &str) -> Result<LookupPayload, LookupError> {
    let handle = handle.trim().trim_start_matches('@');
    if handle.is_empty() {
        return Err(LookupError::MissingHandle);
    }

    let (account, posts) = fetch_account_and_posts(config, handle).await?;
    tracing::debug!(
        handle,
        provider = %config.provider,
        count = posts.len(),
        "fetched posts"
    );

    let keywords = KeywordSet::new(&config.keywords);
    let matched = filter_posts(posts, &keywords);
    tracing::debug!(handle, count = matched.len(), "filtered posts");

    if matched.is_empty() {
        return Err(LookupError::NoMatchingContent);
    }

    let total_count = matched.len();
    let ranked = rank_posts(matched);
    tracing::debug!(
        handle,
        best = %ranked[0].id,
        "ranked posts"
    );

    Ok(format_result(&account, ranked, total_count, config.output_mode))
}
