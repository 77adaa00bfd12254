//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use database::{MemoryReleaseStore, MovieRelease, Subscriber};
use release_bot::sender::RecordingSender;
use release_bot::{routes, AppState, Notifier, NotifierConfig};
use telegram_client::Update;
use tokio::sync::mpsc;
use tower::ServiceExt;

const TOKEN: &str = "123456:test-token";

fn app(store: MemoryReleaseStore, sender: RecordingSender) -> (Router, mpsc::Receiver<Update>) {
    let (tx, rx) = mpsc::channel(8);
    let notifier = Notifier::new(Arc::new(store), Arc::new(sender), NotifierConfig::default());
    let router = routes::router().with_state(AppState::new(tx, notifier, TOKEN));
    (router, rx)
}

fn update_request(token: &str) -> Request<Body> {
    let body = serde_json::json!({
        "update_id": 77,
        "message": {
            "message_id": 5,
            "date": 1544779800,
            "chat": {"id": 42, "type": "private"},
            "text": "list subscriptions"
        }
    });
    Request::builder()
        .method(Method::POST)
        .uri(format!("/telegram/{}", token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _rx) = app(MemoryReleaseStore::new(), RecordingSender::new());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_webhook_queues_update() {
    let (app, mut rx) = app(MemoryReleaseStore::new(), RecordingSender::new());

    let response = app.oneshot(update_request(TOKEN)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let update = rx.try_recv().unwrap();
    assert_eq!(update.update_id, 77);
    assert_eq!(update.text_message(), Some((42, "list subscriptions")));
}

#[tokio::test]
async fn test_webhook_rejects_wrong_token() {
    let (app, mut rx) = app(MemoryReleaseStore::new(), RecordingSender::new());

    let response = app.oneshot(update_request("999:other")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_webhook_unavailable_without_processor() {
    let (app, rx) = app(MemoryReleaseStore::new(), RecordingSender::new());
    drop(rx);

    let response = app.oneshot(update_request(TOKEN)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_notify_task_reports_pass() {
    let mut release = MovieRelease::new(
        399579,
        "Alita: Battle Angel",
        (Utc::now() + Duration::days(3)).date_naive(),
    );
    release.subscribers = vec![Subscriber::new(42)];
    let store = MemoryReleaseStore::with_records([release]);
    let sender = RecordingSender::new();
    let (app, _rx) = app(store.clone(), sender.clone());

    let response = app
        .clone()
        .oneshot(Request::post("/tasks/notify").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({
            "releases_in_window": 1,
            "notified": 1,
            "failed": 0,
            "pruned": 0
        })
    );
    assert_eq!(sender.texts_for(42).len(), 1);

    let response = app
        .oneshot(Request::get("/tasks/notify").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(response).await["notified"], 0);
    assert!(store.get(399579).await.unwrap().all_notified());
}
