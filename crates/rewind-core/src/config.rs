use crate::app_config::{AppConfig, Environment, OutputMode, Provider};
use crate::ConfigError;

/// Keyword set the relevance filter matches against when `REWIND_KEYWORDS`
/// is not set. Matching is case-insensitive substring containment.
const DEFAULT_KEYWORDS: &str = "gmic,seismic,@seismicsys,seismicsys,#gmic,#seismic,$gmic,$seismic";

/// Mirror bases probed in order when the `mirror` provider is selected and
/// `REWIND_MIRROR_URLS` is not set.
const DEFAULT_MIRROR_URLS: &str =
    "https://nitter.net,https://nitter.poast.org,https://nitter.privacyredirect.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_list = |var: &str, default: &str| -> Vec<String> {
        or_default(var, default)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };

    let env = parse_environment(&or_default("REWIND_ENV", "development"));
    let bind_addr = parse_addr("REWIND_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("REWIND_LOG_LEVEL", "info");

    let provider = parse_provider(&or_default("REWIND_PROVIDER", "socialdata"))?;
    let keywords = parse_list("REWIND_KEYWORDS", DEFAULT_KEYWORDS);
    let output_mode = parse_output_mode(&or_default("REWIND_OUTPUT_MODE", "top:10"))?;
    let fetch_limit = parse_usize("REWIND_FETCH_LIMIT", "100")?;
    let request_timeout_secs = parse_u64("REWIND_REQUEST_TIMEOUT_SECS", "10")?;
    let mirror_urls = parse_list("REWIND_MIRROR_URLS", DEFAULT_MIRROR_URLS);

    let socialdata_api_key = lookup("SOCIALDATA_API_KEY").ok();
    let twitter_bearer_token = lookup("TWITTER_BEARER_TOKEN").ok();
    let reseller_api_key = lookup("RESELLER_API_KEY").ok();

    // Credentials are only required for the provider actually selected.
    match provider {
        Provider::SocialData if socialdata_api_key.is_none() => {
            return Err(ConfigError::MissingEnvVar("SOCIALDATA_API_KEY".to_string()));
        }
        Provider::Official if twitter_bearer_token.is_none() => {
            return Err(ConfigError::MissingEnvVar(
                "TWITTER_BEARER_TOKEN".to_string(),
            ));
        }
        Provider::Reseller if reseller_api_key.is_none() => {
            return Err(ConfigError::MissingEnvVar("RESELLER_API_KEY".to_string()));
        }
        Provider::Mirror if mirror_urls.is_empty() => {
            return Err(ConfigError::InvalidEnvVar {
                var: "REWIND_MIRROR_URLS".to_string(),
                reason: "mirror provider requires at least one mirror URL".to_string(),
            });
        }
        _ => {}
    }

    if keywords.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "REWIND_KEYWORDS".to_string(),
            reason: "keyword list must not be empty".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        provider,
        keywords,
        output_mode,
        fetch_limit,
        request_timeout_secs,
        mirror_urls,
        socialdata_api_key,
        twitter_bearer_token,
        reseller_api_key,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_provider(s: &str) -> Result<Provider, ConfigError> {
    match s {
        "socialdata" => Ok(Provider::SocialData),
        "official" => Ok(Provider::Official),
        "reseller" => Ok(Provider::Reseller),
        "mirror" => Ok(Provider::Mirror),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REWIND_PROVIDER".to_string(),
            reason: format!("unknown provider '{other}'"),
        }),
    }
}

/// Parse the output mode flag: `best`, or `top:N` for a top-N payload.
fn parse_output_mode(s: &str) -> Result<OutputMode, ConfigError> {
    if s == "best" {
        return Ok(OutputMode::Best);
    }
    if let Some(n) = s.strip_prefix("top:") {
        let n: usize = n.parse().map_err(|_| ConfigError::InvalidEnvVar {
            var: "REWIND_OUTPUT_MODE".to_string(),
            reason: format!("invalid top-N count '{n}'"),
        })?;
        if n == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "REWIND_OUTPUT_MODE".to_string(),
                reason: "top-N count must be at least 1".to_string(),
            });
        }
        return Ok(OutputMode::TopN(n));
    }
    Err(ConfigError::InvalidEnvVar {
        var: "REWIND_OUTPUT_MODE".to_string(),
        reason: format!("expected 'best' or 'top:N', got '{s}'"),
    })
}
