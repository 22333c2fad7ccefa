//! Integration tests for the ClearPass device proxy.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_device_endpoints_require_session() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/get_device_info?macaddr=aa:bb:cc:dd:ee:ff", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Autentisering kreves.");

    let response = app
        .request(
            "POST",
            "/create_device",
            Some(json!({ "mac": "aa:bb:cc:dd:ee:ff", "role_id": 2 })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/get_device_info?macaddr=aa:bb:cc:dd:ee:ff", None, Some("bogus"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert!(app.clearpass.recorded().await.is_empty());
}

#[tokio::test]
async fn test_get_device_info() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request("GET", "/get_device_info?macaddr=aa:bb:cc:dd:ee:ff", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["mac"], "aa:bb:cc:dd:ee:ff");
    assert_eq!(response.body["role_id"], 2);

    let recorded = app.clearpass.recorded().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/api/device/mac/aa:bb:cc:dd:ee:ff");
    assert_eq!(recorded[0].authorization.as_deref(), Some("Bearer cp-token-1"));
}

#[tokio::test]
async fn test_get_device_info_validates_mac() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request("GET", "/get_device_info", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "MAC-adresse er påkrevd.");

    let response = app
        .request("GET", "/get_device_info?macaddr=not-a-mac", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Ugyldig MAC-adresse.");

    assert!(app.clearpass.recorded().await.is_empty());
}

#[tokio::test]
async fn test_unknown_device_passes_upstream_status() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request("GET", "/get_device_info?macaddr=00:00:00:00:00:00", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "UPSTREAM");
}

#[tokio::test]
async fn test_token_is_reused_across_calls() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    for _ in 0..3 {
        let response = app
            .request("GET", "/get_device_info?macaddr=aabbccddeeff", None, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(
        app.clearpass
            .token_requests
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn test_create_device() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request(
            "POST",
            "/create_device",
            Some(json!({
                "mac": "AA-BB-CC-DD-EE-FF",
                "role_id": 2,
                "visitor_name": "Kjøledisk 4",
                "enabled": true
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["id"], 42);

    let recorded = app.clearpass.recorded().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "POST");
    assert_eq!(recorded[0].body["mac"], "AA-BB-CC-DD-EE-FF");
    assert_eq!(recorded[0].body["visitor_name"], "Kjøledisk 4");
    assert_eq!(recorded[0].body["sponsor_name"], "ola@ngdata.no");
}

#[tokio::test]
async fn test_create_device_missing_fields() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request(
            "POST",
            "/create_device",
            Some(json!({ "mac": "aa:bb:cc:dd:ee:ff" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Påkrevde felt mangler: ['mac', 'role_id']"
    );
}

#[tokio::test]
async fn test_create_device_with_role_not_granted() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request(
            "POST",
            "/create_device",
            Some(json!({ "mac": "aa:bb:cc:dd:ee:ff", "role_id": "3" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "Du har ikke tilgang til denne rollen.");
    assert!(app.clearpass.recorded().await.is_empty());
}

#[tokio::test]
async fn test_non_scalar_role_id_is_rejected() {
    let app = helpers::TestApp::new().await;
    let token = app.login("kari@partner.no").await;

    for role_id in [json!([2]), json!(true), json!({ "role_id": 2 })] {
        let response = app
            .request(
                "POST",
                "/create_device",
                Some(json!({ "mac": "aabbccddeeff", "role_id": role_id.clone() })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Ugyldig rolle-ID.");

        let response = app
            .request(
                "PATCH",
                "/update_device",
                Some(json!({ "mac": "aabbccddeeff", "role_id": role_id })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "Ugyldig rolle-ID.");
    }

    assert!(app.clearpass.recorded().await.is_empty());
}

#[tokio::test]
async fn test_unrestricted_entry_may_assign_any_role() {
    let app = helpers::TestApp::new().await;
    let token = app.login("sjef@ngdata.no").await;

    let response = app
        .request(
            "POST",
            "/create_device",
            Some(json!({ "mac": "aa:bb:cc:dd:ee:ff", "role_id": 99 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_device_forwards_known_fields() {
    let app = helpers::TestApp::new().await;
    let token = app.login("kari@partner.no").await;

    let response = app
        .request(
            "PATCH",
            "/update_device",
            Some(json!({
                "mac": "aa:bb:cc:dd:ee:ff",
                "role_id": 4,
                "enabled": false,
                "sponsor_name": "Kari",
                "unrelated": "dropped"
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["enabled"], false);

    let recorded = app.clearpass.recorded().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].method, "PATCH");
    assert_eq!(recorded[0].path, "/api/device/mac/aa:bb:cc:dd:ee:ff");
    assert_eq!(recorded[0].body["role_id"], 4);
    assert_eq!(recorded[0].body["sponsor_name"], "Kari");
    assert!(recorded[0].body.get("unrelated").is_none());
}

#[tokio::test]
async fn test_update_device_accepts_post() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request(
            "POST",
            "/update_device",
            Some(json!({ "mac": "aabb.ccdd.eeff", "visitor_name": "Vekt 2" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["visitor_name"], "Vekt 2");
    assert_eq!(response.body["sponsor_name"], "ola@ngdata.no");
}

#[tokio::test]
async fn test_update_device_requires_mac() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request(
            "PATCH",
            "/update_device",
            Some(json!({ "role_id": 2 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Påkrevde felt mangler: ['mac']");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = helpers::TestApp::new().await;
    let token = app.login("ola@ngdata.no").await;

    let response = app
        .request("POST", "/create_device", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Ugyldig forespørsel.");
}
