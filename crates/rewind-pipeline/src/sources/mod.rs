//! Ingest sources, one module per upstream provider.
//!
//! Every source resolves a handle to `(Account, Vec<Post>)` in the common
//! normalized shape, or fails with the shared [`LookupError`] taxonomy.
//! Two strategies exist: two-step lookups (profile, then posts by provider
//! id) and single combined queries (search-style). The orchestrator treats
//! them uniformly through [`fetch_account_and_posts`].

mod mirror;
mod mirror_feed;
mod official;
mod reseller;
mod socialdata;

pub use mirror::MirrorClient;
pub use official::OfficialClient;
pub use reseller::ResellerClient;
pub use socialdata::SocialDataClient;

use reqwest::StatusCode;
use rewind_core::{AppConfig, Provider};

use crate::error::LookupError;
use crate::types::{Account, Post};

/// Fetch from whichever provider the config selects.
///
/// # Errors
///
/// Propagates the selected source's failures unchanged.
pub(crate) async fn fetch_account_and_posts(
    config: &AppConfig,
    handle: &str,
) -> Result<(Account, Vec<Post>), LookupError> {
    // Config loading already rejected a selected provider with a missing
    // credential, so an absent key here only produces an upstream 401.
    match config.provider {
        Provider::SocialData => {
            let key = config.socialdata_api_key.as_deref().unwrap_or_default();
            SocialDataClient::new(key, config.request_timeout_secs)?
                .fetch_account_and_posts(handle, config.fetch_limit)
                .await
        }
        Provider::Official => {
            let token = config.twitter_bearer_token.as_deref().unwrap_or_default();
            OfficialClient::new(token, config.request_timeout_secs)?
                .fetch_account_and_posts(handle, config.fetch_limit)
                .await
        }
        Provider::Reseller => {
            let key = config.reseller_api_key.as_deref().unwrap_or_default();
            ResellerClient::new(key, config.request_timeout_secs)?
                .fetch_account_and_posts(handle, config.fetch_limit)
                .await
        }
        Provider::Mirror => {
            MirrorClient::new(config.mirror_urls.clone(), config.request_timeout_secs)?
                .fetch_account_and_posts(handle, config.fetch_limit)
                .await
        }
    }
}

/// Map a non-success upstream status to the shared failure taxonomy.
///
/// 404 means the account does not exist, 402 is a quota/billing rejection,
/// 429 is rate limiting; anything else is a generic upstream failure with
/// the status preserved for logs.
pub(super) fn status_failure(handle: &str, status: StatusCode) -> LookupError {
    match status.as_u16() {
        404 => LookupError::AccountNotFound(handle.to_string()),
        402 => LookupError::QuotaExceeded,
        429 => LookupError::RateLimited,
        status => LookupError::UpstreamError { status },
    }
}

/// Shared reqwest client construction: per-request timeout, bounded connect.
pub(super) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, LookupError> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .connect_timeout(std::time::Duration::from_secs(10))
        .user_agent("rewind/0.1 (year-in-review)")
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_404_is_account_not_found() {
        let err = status_failure("tester", StatusCode::NOT_FOUND);
        assert!(matches!(err, LookupError::AccountNotFound(ref h) if h == "tester"));
    }

    #[test]
    fn status_402_is_quota_exceeded() {
        assert!(matches!(
            status_failure("tester", StatusCode::PAYMENT_REQUIRED),
            LookupError::QuotaExceeded
        ));
    }

    #[test]
    fn status_429_is_rate_limited() {
        assert!(matches!(
            status_failure("tester", StatusCode::TOO_MANY_REQUESTS),
            LookupError::RateLimited
        ));
    }

    #[test]
    fn other_statuses_preserve_code() {
        assert!(matches!(
            status_failure("tester", StatusCode::BAD_GATEWAY),
            LookupError::UpstreamError { status: 502 }
        ));
    }
}
