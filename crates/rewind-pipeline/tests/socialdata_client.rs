//! Integration tests for `SocialDataClient` using wiremock HTTP mocks.

use rewind_pipeline::{LookupError, SocialDataClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SocialDataClient {
    SocialDataClient::with_base_url("test-key", 10, base_url)
        .expect("client construction should not fail")
}

fn profile_body() -> serde_json::Value {
    serde_json::json!({
        "id": 4_200_000_000_u64,
        "id_str": "4200000000",
        "screen_name": "tester",
        "profile_image_url_https": "https://cdn.example/tester.jpg"
    })
}

#[tokio::test]
async fn fetches_profile_then_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/twitter/user/tester"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;

    let timeline = serde_json::json!({
        "tweets": [
            {
                "id_str": "111",
                "full_text": "posting about $GMIC",
                "favorite_count": 5,
                "retweet_count": 2,
                "reply_count": 1,
                "views_count": 900,
                "tweet_created_at": "2024-11-02T10:00:00Z"
            },
            {
                "id": 222,
                "text": "short form only"
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/twitter/user/4200000000/tweets-and-replies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&timeline))
        .mount(&server)
        .await;

    let (account, posts) = test_client(&server.uri())
        .fetch_account_and_posts("tester", 100)
        .await
        .expect("lookup should succeed");

    assert_eq!(account.handle, "tester");
    assert_eq!(
        account.display_image_url.as_deref(),
        Some("https://cdn.example/tester.jpg")
    );
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "111");
    assert_eq!(posts[0].text, "posting about $GMIC");
    assert_eq!(posts[0].like_count, 5);
    assert_eq!(posts[0].view_count, 900);
    assert_eq!(posts[1].id, "222");
    assert_eq!(posts[1].like_count, 0);
}

#[tokio::test]
async fn profile_404_is_account_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/twitter/user/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_account_and_posts("ghost", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::AccountNotFound(ref h) if h == "ghost"));
}

#[tokio::test]
async fn profile_402_is_quota_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/twitter/user/tester"))
        .respond_with(ResponseTemplate::new(402))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_account_and_posts("tester", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::QuotaExceeded));
}

#[tokio::test]
async fn timeline_429_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/twitter/user/tester"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/twitter/user/4200000000/tweets-and-replies"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_account_and_posts("tester", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::RateLimited));
}

#[tokio::test]
async fn unexpected_status_preserved_for_diagnostics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/twitter/user/tester"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .fetch_account_and_posts("tester", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::UpstreamError { status: 503 }));
}

#[tokio::test]
async fn fetch_limit_caps_timeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/twitter/user/tester"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;

    let tweets: Vec<serde_json::Value> = (0..30)
        .map(|i| serde_json::json!({ "id_str": i.to_string(), "text": "x" }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/twitter/user/4200000000/tweets-and-replies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tweets": tweets })))
        .mount(&server)
        .await;

    let (_, posts) = test_client(&server.uri())
        .fetch_account_and_posts("tester", 20)
        .await
        .unwrap();
    assert_eq!(posts.len(), 20);
}
