//! Best-post selection pipeline.
//!
//! Given an account handle, one of several upstream providers supplies raw
//! posts; the pipeline normalizes them into a common [`Post`] shape, keeps
//! those matching a configured keyword set, ranks them by engagement, and
//! formats the winners into the payload the front end consumes.

mod error;
mod filter;
mod format;
mod pipeline;
mod rank;
mod sources;
mod types;

pub use error::LookupError;
pub use filter::{filter_posts, KeywordSet};
pub use format::format_result;
pub use pipeline::run_lookup;
pub use rank::{engagement_score, rank_posts, select_top_n};
pub use sources::{MirrorClient, OfficialClient, ResellerClient, SocialDataClient};
pub use types::{Account, LookupPayload, Post, RankedPost};
