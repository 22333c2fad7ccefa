//! Fake ClearPass server for unit tests.

use axum::Router;
use tekniker_core::config::clearpass::ClearPassConfig;

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client configuration pointing at a fake server.
pub(crate) fn config(base_url: &str) -> ClearPassConfig {
    ClearPassConfig {
        base_url: base_url.to_string(),
        client_id: "tekniker".to_string(),
        client_secret: "secret".to_string(),
        request_timeout_seconds: 5,
        ..ClearPassConfig::default()
    }
}
