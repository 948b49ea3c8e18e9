//! Integration tests for `XClient` using wiremock HTTP mocks.

use chrono::{TimeZone, Utc};
use veyra_x::{RecentPostsQuery, XApiError, XClient};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> XClient {
    XClient::with_base_url("test-token", 30, base_url)
        .expect("client construction should not fail")
}

fn timeline_query(max_results: usize) -> RecentPostsQuery {
    RecentPostsQuery {
        max_results,
        start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        exclude: vec!["retweets".to_string(), "replies".to_string()],
        tweet_fields: vec![],
    }
}

#[tokio::test]
async fn get_user_returns_parsed_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/by/username/bonk_inu"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "id": "1234", "username": "bonk_inu", "name": "BONK" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let user = client.get_user("bonk_inu").await.expect("should parse user");

    assert_eq!(user.id, "1234");
    assert_eq!(user.username, "bonk_inu");
    assert_eq!(user.name, "BONK");
}

#[tokio::test]
async fn get_user_without_data_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/by/username/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [{
                "title": "Not Found Error",
                "detail": "Could not find user with username: [ghost]."
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_user("ghost").await.unwrap_err();

    assert!(
        matches!(err, XApiError::UserNotFound { ref username } if username == "ghost"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn get_user_tweets_sends_timeline_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1234/tweets"))
        .and(query_param("max_results", "10"))
        .and(query_param("start_time", "2024-01-01T00:00:00Z"))
        .and(query_param("exclude", "retweets,replies"))
        .and(query_param("tweet.fields", "created_at,text,public_metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "id": "1",
                    "text": "bonk szn",
                    "created_at": "2024-01-02T08:30:00.000Z",
                    "public_metrics": {
                        "retweet_count": 4,
                        "reply_count": 1,
                        "like_count": 20,
                        "quote_count": 0
                    }
                },
                { "id": "2", "text": "gm", "created_at": "2024-01-02T09:00:00.000Z" }
            ],
            "meta": { "result_count": 2 }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .get_user_tweets("1234", &timeline_query(10))
        .await
        .expect("should parse timeline");

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].text, "bonk szn");
    assert_eq!(posts[0].public_metrics.like_count, 20);
    assert_eq!(posts[1].public_metrics.like_count, 0);
}

#[tokio::test]
async fn get_user_tweets_clamps_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1234/tweets"))
        .and(query_param("max_results", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "result_count": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .get_user_tweets("1234", &timeline_query(1))
        .await
        .expect("empty timeline is not an error");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn get_followers_passes_pagination_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1234/followers"))
        .and(query_param("max_results", "100"))
        .and(query_param("pagination_token", "PAGE2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "id": "7", "username": "alice", "name": "Alice", "location": "Lisbon" }
            ],
            "meta": { "result_count": 1, "next_token": "PAGE3" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client
        .get_followers("1234", 100, Some("PAGE2"))
        .await
        .expect("should parse followers");

    assert_eq!(page.users.len(), 1);
    assert_eq!(page.users[0].username, "alice");
    assert_eq!(
        page.users[0].extra.get("location"),
        Some(&serde_json::json!("Lisbon"))
    );
    assert_eq!(page.next_token.as_deref(), Some("PAGE3"));
}

#[tokio::test]
async fn create_post_sends_reply_target() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tweets"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(serde_json::json!({
            "text": "part two",
            "reply": { "in_reply_to_tweet_id": "100" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": { "id": "101", "text": "part two" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let created = client
        .create_post("part two", Some("100"))
        .await
        .expect("should create reply");

    assert_eq!(created.id, "101");
}

#[tokio::test]
async fn create_post_surfaces_rate_limit_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tweets"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "title": "Too Many Requests",
            "detail": "Too Many Requests",
            "status": 429
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.create_post("hello", None).await.unwrap_err();

    assert!(err.is_rate_limited(), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_api_error_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1234/tweets"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .get_user_tweets("1234", &timeline_query(10))
        .await
        .unwrap_err();

    assert!(
        matches!(err, XApiError::Api { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/by/username/phantom"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_user("phantom").await.unwrap_err();

    assert!(matches!(err, XApiError::Deserialize { .. }), "got {err:?}");
}
