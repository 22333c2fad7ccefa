//! Integration tests for per-client rate limiting of the login endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;
use tekniker_core::config::auth::RateLimitRule;

#[tokio::test]
async fn test_request_code_is_rate_limited() {
    let app = helpers::TestApp::with_config(|c| {
        c.auth.rate_limits.request_code = vec![RateLimitRule::new(2, 3600)];
    })
    .await;

    for _ in 0..2 {
        let response = app
            .request(
                "POST",
                "/request_auth_code",
                Some(json!({ "email": "ola@ngdata.no" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app
        .request(
            "POST",
            "/request_auth_code",
            Some(json!({ "email": "ola@ngdata.no" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["code"], "RATE_LIMIT");

    let retry_after = response.body["retry_after"].as_u64().unwrap();
    assert!((1..=3600).contains(&retry_after));
    assert_eq!(
        response.headers["retry-after"].to_str().unwrap(),
        retry_after.to_string()
    );

    // Rejected requests never reach the mailer.
    assert_eq!(app.mailer.sent.lock().await.len(), 2);
}

#[tokio::test]
async fn test_login_limit_is_separate_from_request_code() {
    let app = helpers::TestApp::with_config(|c| {
        c.auth.rate_limits.login = vec![RateLimitRule::new(1, 3600)];
    })
    .await;

    let body = json!({ "email": "ola@ngdata.no", "code": "000-000" });
    let response = app.request("POST", "/login", Some(body.clone()), None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.request("POST", "/login", Some(body), None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    let response = app
        .request(
            "POST",
            "/request_auth_code",
            Some(json!({ "email": "ola@ngdata.no" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_clients_are_counted_separately() {
    let app = helpers::TestApp::with_config(|c| {
        c.server.trust_forwarded_for = true;
        c.auth.rate_limits.request_code = vec![RateLimitRule::new(1, 3600)];
    })
    .await;

    let body = json!({ "email": "ola@ngdata.no" });
    let send = |ip: &'static str| {
        let body = body.clone();
        let app = &app;
        async move {
            app.request_with_headers(
                "POST",
                "/request_auth_code",
                Some(body),
                &[("X-Forwarded-For", ip)],
            )
            .await
            .status
        }
    };

    assert_eq!(send("203.0.113.1").await, StatusCode::OK);
    assert_eq!(send("203.0.113.1").await, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(send("203.0.113.2").await, StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_rate_limits() {
    let app = helpers::TestApp::with_config(|c| {
        c.auth.rate_limits.enabled = false;
        c.auth.rate_limits.request_code = vec![RateLimitRule::new(1, 3600)];
    })
    .await;

    for _ in 0..3 {
        let response = app
            .request(
                "POST",
                "/request_auth_code",
                Some(json!({ "email": "ola@ngdata.no" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}
