//! HTML pages are served whatever the chat availability

mod common;

use bytezinho::handlers::page_handler;
use bytezinho::pages::Page;
use common::{app_state, degraded, ready, RecordingConversation};
use warp::http::StatusCode;
use warp::Reply;

async fn assert_pages_are_html(state: std::sync::Arc<bytezinho::state::AppState>) {
    for page in Page::ALL {
        let response = page_handler(page, state.clone())
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK, "{:?}", page);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{:?}: {}", page, content_type);
    }
}

#[tokio::test]
async fn test_pages_when_degraded() {
    let dir = tempfile::tempdir().unwrap();
    assert_pages_are_html(app_state(degraded(), &dir.path().join("leads.txt"))).await;
}

#[tokio::test]
async fn test_pages_when_ready() {
    let dir = tempfile::tempdir().unwrap();
    let chat = ready(RecordingConversation::replying("ok"), "k");
    assert_pages_are_html(app_state(chat, &dir.path().join("leads.txt"))).await;
}
