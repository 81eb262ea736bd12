//! E2E test backend for the Stormwatch client.
//!
//! Serves the same contract as the production aggregation server: a `/ws`
//! push channel emitting a scripted rotation of `EVENT_UPSERT` frames and
//! the four inbox REST endpoints over an in-memory store.
//!
//! ```bash
//! cargo run -p stormwatch-e2e-server --bin e2e-server
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State as AxumState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{any, get, patch};
use axum::{Json, Router};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use stormwatch_protocol::{EventSummary, InboxNotification, PushMessage, UnreadCount};

/// Interval between scripted push frames.
const PUSH_INTERVAL: Duration = Duration::from_secs(3);

/// Shared server state passed to every axum handler.
struct ServerState {
    inbox: Mutex<Vec<InboxNotification>>,
}

type SharedServer = Arc<ServerState>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let server = Arc::new(ServerState {
        inbox: Mutex::new(seed_inbox()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", any(ws_handler))
        .route("/api/user/notifications", get(list_notifications))
        .route("/api/user/notifications/unread-count", get(unread_count))
        .route("/api/user/notifications/{id}/read", patch(mark_read))
        .route("/api/user/notifications/read-all", patch(mark_all_read))
        .route("/health", get(|| async { "ok" }))
        .layer(cors)
        .with_state(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
    tracing::info!("e2e server listening on http://127.0.0.1:8000");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(push_loop)
}

/// Emit one scripted frame per tick until the client goes away. Every
/// fifth frame is an unrecognized message type, which a correct client
/// ignores without error.
async fn push_loop(mut socket: WebSocket) {
    tracing::info!("push channel client connected");
    let script = event_script();
    let mut interval = tokio::time::interval(PUSH_INTERVAL);
    let mut seq = 0usize;

    loop {
        interval.tick().await;
        let frame = if seq % 5 == 4 {
            json!({"type": "HEARTBEAT", "data": {"seq": seq}}).to_string()
        } else {
            let event = script[seq % script.len()].clone();
            match serde_json::to_string(&PushMessage::EventUpsert { data: event }) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to serialize push frame");
                    continue;
                }
            }
        };
        seq += 1;
        if socket.send(Message::Text(frame.into())).await.is_err() {
            break;
        }
    }
    tracing::info!("push channel client disconnected");
}

async fn list_notifications(
    AxumState(server): AxumState<SharedServer>,
) -> Json<Vec<InboxNotification>> {
    Json(server.inbox.lock().clone())
}

async fn unread_count(AxumState(server): AxumState<SharedServer>) -> Json<UnreadCount> {
    let count = server.inbox.lock().iter().filter(|n| !n.is_read).count() as u64;
    Json(UnreadCount { count })
}

async fn mark_read(
    AxumState(server): AxumState<SharedServer>,
    Path(id): Path<String>,
) -> StatusCode {
    let mut inbox = server.inbox.lock();
    match inbox.iter_mut().find(|n| n.id == id) {
        Some(item) => {
            item.is_read = true;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn mark_all_read(AxumState(server): AxumState<SharedServer>) -> StatusCode {
    for item in server.inbox.lock().iter_mut() {
        item.is_read = true;
    }
    StatusCode::NO_CONTENT
}

/// Rotation of event updates: a mix of high-confidence, source-confirmed
/// and low-quality/unknown-type events, so both sides of the visibility
/// policy show up in a connected client.
fn event_script() -> Vec<EventSummary> {
    vec![
        EventSummary {
            event_id: "ev-1001".into(),
            title: "Flash floods across Chiang Rai lowlands".into(),
            province: "Chiang Rai".into(),
            disaster_type: "flood".into(),
            confidence: 0.92,
            needs_verification: 0,
            sources_count: 4,
        },
        EventSummary {
            event_id: "ev-1002".into(),
            title: "Tropical storm approaching the gulf coast".into(),
            province: "Surat Thani".into(),
            disaster_type: "storm".into(),
            confidence: 0.55,
            needs_verification: 0,
            sources_count: 3,
        },
        EventSummary {
            event_id: "ev-1003".into(),
            title: "Unconfirmed tremor reports".into(),
            province: "Kanchanaburi".into(),
            disaster_type: "unknown".into(),
            confidence: 0.95,
            needs_verification: 1,
            sources_count: 1,
        },
        EventSummary {
            event_id: "ev-1004".into(),
            title: "Wildfire spreading near Doi Suthep".into(),
            province: "Chiang Mai".into(),
            disaster_type: "wildfire".into(),
            confidence: 0.45,
            needs_verification: 1,
            sources_count: 1,
        },
    ]
}

fn seed_inbox() -> Vec<InboxNotification> {
    vec![
        InboxNotification {
            id: "n-1".into(),
            title: "New event in your watched provinces".into(),
            message: "Flash floods across Chiang Rai lowlands".into(),
            link: Some("/events/ev-1001".into()),
            is_read: false,
            created_at: Utc::now(),
        },
        InboxNotification {
            id: "n-2".into(),
            title: "Event updated".into(),
            message: "Tropical storm approaching the gulf coast".into(),
            link: Some("/events/ev-1002".into()),
            is_read: false,
            created_at: Utc::now(),
        },
        InboxNotification {
            id: "n-3".into(),
            title: "Weekly digest ready".into(),
            message: "12 events aggregated in the past week".into(),
            link: None,
            is_read: true,
            created_at: Utc::now(),
        },
    ]
}
