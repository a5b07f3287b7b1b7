//! Result formatting into the front-end payload shape.

use rewind_core::OutputMode;

use crate::rank::select_top_n;
use crate::types::{Account, LookupPayload, Post, RankedPost};

/// Providers are inconsistent about including a permalink, so one is always
/// rebuilt from (handle, id) and any provider-supplied link is ignored.
fn permalink(handle: &str, id: &str) -> String {
    format!("https://twitter.com/{handle}/status/{id}")
}

/// Deterministic avatar for accounts whose source returned no profile image.
/// The front end must never receive an empty image reference.
fn fallback_avatar(handle: &str) -> String {
    format!("https://unavatar.io/twitter/{handle}")
}

fn to_ranked(handle: &str, rank: usize, post: &Post) -> RankedPost {
    RankedPost {
        rank,
        id: post.id.clone(),
        text: post.text.clone(),
        likes: post.like_count,
        retweets: post.repost_count,
        replies: post.reply_count,
        views: post.view_count,
        created_at: post.created_at.clone(),
        media: post.media_url.clone(),
        link: permalink(handle, &post.id),
    }
}

/// Map the account and the ranked, non-empty post list into the terminal
/// [`LookupPayload`].
///
/// Ranks are assigned positionally, 1-based. `total_count` is the match
/// count before top-N truncation. In [`OutputMode::Best`] only `best_post`
/// is populated; in [`OutputMode::TopN`] the truncated list rides along.
///
/// # Panics
///
/// Panics if `ranked` is empty. The orchestrator reports
/// `NoMatchingContent` before this stage, so a non-empty input is an
/// invariant here.
#[must_use]
pub fn format_result(
    account: &Account,
    ranked: Vec<Post>,
    total_count: usize,
    mode: OutputMode,
) -> LookupPayload {
    assert!(!ranked.is_empty(), "format_result requires ranked posts");

    let handle = account.handle.as_str();
    let pfp_url = account
        .display_image_url
        .clone()
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| fallback_avatar(handle));

    let best_post = to_ranked(handle, 1, &ranked[0]);
    let top_posts = match mode {
        OutputMode::Best => None,
        OutputMode::TopN(n) => Some(
            select_top_n(ranked, n)
                .iter()
                .enumerate()
                .map(|(i, p)| to_ranked(handle, i + 1, p))
                .collect(),
        ),
    };

    LookupPayload {
        error: false,
        username: handle.to_string(),
        pfp_url,
        total_count,
        best_post,
        top_posts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, likes: u64) -> Post {
        Post {
            id: id.to_string(),
            text: format!("post {id}"),
            like_count: likes,
            repost_count: 0,
            reply_count: 0,
            view_count: 0,
            created_at: "Wed Oct 10 20:19:24 +0000 2018".to_string(),
            media_url: None,
        }
    }

    fn account(image: Option<&str>) -> Account {
        Account {
            handle: "tester".to_string(),
            display_image_url: image.map(str::to_string),
        }
    }

    #[test]
    fn ranks_are_one_based_and_gap_free() {
        let ranked = vec![post("a", 9), post("b", 5), post("c", 1)];
        let payload = format_result(&account(None), ranked, 3, OutputMode::TopN(10));
        let ranks: Vec<usize> = payload
            .top_posts
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.rank)
            .collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(payload.best_post.rank, 1);
        assert_eq!(payload.best_post.id, "a");
    }

    #[test]
    fn top_n_truncates_but_total_count_does_not() {
        let ranked = vec![post("a", 9), post("b", 5), post("c", 1)];
        let payload = format_result(&account(None), ranked, 3, OutputMode::TopN(2));
        assert_eq!(payload.top_posts.as_ref().unwrap().len(), 2);
        assert_eq!(payload.total_count, 3);
    }

    #[test]
    fn best_mode_omits_top_posts() {
        let payload = format_result(&account(None), vec![post("a", 9)], 1, OutputMode::Best);
        assert!(payload.top_posts.is_none());
        assert_eq!(payload.best_post.id, "a");
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("topPosts").is_none());
    }

    #[test]
    fn permalink_rebuilt_from_handle_and_id() {
        let payload = format_result(&account(None), vec![post("12345", 1)], 1, OutputMode::Best);
        assert_eq!(
            payload.best_post.link,
            "https://twitter.com/tester/status/12345"
        );
    }

    #[test]
    fn missing_profile_image_gets_deterministic_fallback() {
        let payload = format_result(&account(None), vec![post("a", 1)], 1, OutputMode::Best);
        assert_eq!(payload.pfp_url, "https://unavatar.io/twitter/tester");
    }

    #[test]
    fn empty_profile_image_also_gets_fallback() {
        let payload = format_result(&account(Some("")), vec![post("a", 1)], 1, OutputMode::Best);
        assert_eq!(payload.pfp_url, "https://unavatar.io/twitter/tester");
    }

    #[test]
    fn provider_image_wins_when_present() {
        let payload = format_result(
            &account(Some("https://cdn.example/pic.jpg")),
            vec![post("a", 1)],
            1,
            OutputMode::Best,
        );
        assert_eq!(payload.pfp_url, "https://cdn.example/pic.jpg");
    }

    #[test]
    fn payload_serializes_front_end_field_names() {
        let payload = format_result(&account(None), vec![post("a", 1)], 1, OutputMode::TopN(1));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["error"], false);
        assert_eq!(json["username"], "tester");
        assert!(json["pfpUrl"].is_string());
        assert_eq!(json["totalCount"], 1);
        let best = &json["bestPost"];
        for field in [
            "rank",
            "id",
            "text",
            "likes",
            "retweets",
            "replies",
            "views",
            "created_at",
            "media",
            "link",
        ] {
            assert!(best.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["topPosts"].as_array().unwrap().len(), 1);
    }
}
