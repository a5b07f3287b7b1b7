use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Upstream data provider the lookup pipeline ingests from.
///
/// Exactly one provider is active per deployment; the pipeline logic is
/// identical across all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Paid aggregation API (two-step profile + timeline lookup).
    SocialData,
    /// Official platform API v2.
    Official,
    /// Reseller search API (single combined query).
    Reseller,
    /// Scraping mirror network serving RSS feeds, tried in priority order.
    Mirror,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::SocialData => write!(f, "socialdata"),
            Provider::Official => write!(f, "official"),
            Provider::Reseller => write!(f, "reseller"),
            Provider::Mirror => write!(f, "mirror"),
        }
    }
}

/// Shape of the success payload: single best post, or best plus a top-N list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Best,
    TopN(usize),
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub provider: Provider,
    pub keywords: Vec<String>,
    pub output_mode: OutputMode,
    pub fetch_limit: usize,
    pub request_timeout_secs: u64,
    pub mirror_urls: Vec<String>,
    pub socialdata_api_key: Option<String>,
    pub twitter_bearer_token: Option<String>,
    pub reseller_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("provider", &self.provider)
            .field("keywords", &self.keywords)
            .field("output_mode", &self.output_mode)
            .field("fetch_limit", &self.fetch_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("mirror_urls", &self.mirror_urls)
            .field(
                "socialdata_api_key",
                &self.socialdata_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "twitter_bearer_token",
                &self.twitter_bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "reseller_api_key",
                &self.reseller_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
