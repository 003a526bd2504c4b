use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use client_core::Dispatcher;
use serde_json::json;
use shared::protocol::{Command, CommandKind};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{app_root::MESSAGE_BOX_RETRY_ID, dom::Document};

#[derive(Clone)]
struct StubState {
    received: Arc<Mutex<Vec<Command>>>,
    failures_left: Arc<AtomicUsize>,
}

async fn handle_xhr(State(state): State<StubState>, Json(command): Json<Command>) -> Response {
    state.received.lock().await.push(command.clone());
    let failing = state
        .failures_left
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok();
    if failing {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    let reply = match command.command {
        CommandKind::Users => json!({
            "status": "ok",
            "kind": "users",
            "data": [
                {"id": 1, "firstName": "A", "lastName": "B"},
                {"id": 2, "firstName": "C", "lastName": "D"}
            ]
        }),
        CommandKind::Slots => json!({
            "status": "ok",
            "kind": "slots",
            "data": [{
                "UID": command.user.unwrap_or_default(),
                "Comment": "planning",
                "Start": "2024-03-01T09:00:00Z",
                "End": "2024-03-01T10:00:00Z"
            }]
        }),
        CommandKind::Add | CommandKind::Delete => json!({"status": "ok", "kind": command.command}),
    };
    Json(reply).into_response()
}

async fn spawn_xhr_server(failures: usize) -> (String, Arc<Mutex<Vec<Command>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        received: Arc::clone(&received),
        failures_left: Arc::new(AtomicUsize::new(failures)),
    };
    let app = Router::new()
        .route("/xhr", post(handle_xhr))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), received)
}

fn page_for(server_url: &str) -> Page {
    let outbox = Arc::new(MessageOutbox::default());
    let dispatcher = Dispatcher::new(server_url, outbox.clone()).expect("dispatcher");
    let root = ApplicationRoot::new(Document::host_page()).expect("root");
    Page::new(root, Arc::new(dispatcher), outbox)
}

#[tokio::test]
async fn search_sends_selected_user_and_stores_slots() {
    let (server_url, received) = spawn_xhr_server(0).await;
    let mut page = page_for(&server_url);

    page.handle(UiEvent::Mount).await.expect("mount");
    page.handle(UiEvent::UserFilterChanged("2".to_string()))
        .await
        .expect("choose user");
    page.handle(UiEvent::FromChanged("09:00".to_string()))
        .await
        .expect("from");
    page.handle(UiEvent::SearchClicked).await.expect("search");

    assert_eq!(
        *received.lock().await,
        vec![Command::users(), Command::slots("2")]
    );
    let state = page.view().state().snapshot().await;
    assert_eq!(state.users.len(), 2);
    assert_eq!(state.slots.len(), 1);
    assert_eq!(state.slots[0].uid, "2");

    let document = page.root().document();
    assert_eq!(
        document
            .element_by_id(USER_FILTER_ID)
            .expect("select")
            .current_value(),
        "2"
    );
    assert_eq!(
        document
            .element_by_id(FROM_FILTER_ID)
            .expect("from")
            .current_value(),
        "09:00"
    );
}

#[tokio::test]
async fn failure_status_shows_retry_and_retry_resends() {
    let (server_url, received) = spawn_xhr_server(1).await;
    let mut page = page_for(&server_url);

    page.handle(UiEvent::Mount).await.expect("mount swallows failure");
    assert!(page
        .root()
        .document()
        .element_by_id(MESSAGE_BOX_RETRY_ID)
        .is_some());
    assert!(page.view().state().snapshot().await.users.is_empty());

    page.handle(UiEvent::RetryClicked).await.expect("retry");

    assert_eq!(
        *received.lock().await,
        vec![Command::users(), Command::users()]
    );
    assert!(page
        .root()
        .anchor(Anchor::Notifier)
        .expect("notifier")
        .children()
        .is_empty());
    assert_eq!(page.view().state().snapshot().await.users.len(), 2);
}

#[tokio::test]
async fn message_boxes_are_shown_even_when_rendering_fails() {
    let (server_url, _received) = spawn_xhr_server(1).await;
    let mut page = page_for(&server_url);
    page.root
        .anchor_mut(Anchor::Display)
        .expect("display")
        .set_id("detachedDisplay");

    let err = page
        .handle(UiEvent::Mount)
        .await
        .expect_err("display is gone");
    assert!(matches!(err, PageError::MissingAnchor("appDisplay")));

    let notifier = page.root().anchor(Anchor::Notifier).expect("notifier");
    assert_eq!(notifier.children().len(), 1);
    assert_eq!(
        notifier.children()[0].children()[0].inner_text(),
        Some("Service Unavailable")
    );
    assert!(page
        .root()
        .document()
        .element_by_id(MESSAGE_BOX_RETRY_ID)
        .is_some());
}

#[tokio::test]
async fn unknown_user_key_is_rejected() {
    let (server_url, _received) = spawn_xhr_server(0).await;
    let mut page = page_for(&server_url);
    page.handle(UiEvent::Mount).await.expect("mount");

    let err = page
        .handle(UiEvent::UserFilterChanged("42".to_string()))
        .await
        .expect_err("unknown key");
    assert!(matches!(err, PageError::UnknownOption { value, .. } if value == "42"));
}

#[tokio::test]
async fn run_drains_event_channel() {
    let (server_url, received) = spawn_xhr_server(0).await;
    let mut page = page_for(&server_url);
    let (tx, rx) = mpsc::channel(8);

    for event in [
        UiEvent::Mount,
        UiEvent::UserFilterChanged("42".to_string()),
        UiEvent::SearchClicked,
        UiEvent::Unmount,
    ] {
        tx.send(event).await.expect("queue");
    }
    drop(tx);
    page.run(rx).await;

    assert_eq!(
        *received.lock().await,
        vec![Command::users(), Command::slots("all")]
    );
    assert!(page
        .root()
        .anchor(Anchor::Display)
        .expect("display")
        .children()
        .is_empty());
}
