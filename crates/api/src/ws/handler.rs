use axum::{
    extract::{Query, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bson::oid::ObjectId;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use pawcare_db::models::ChatRole;

use crate::state::AppState;

use super::storage::{channel_name, WsSender};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// Credentials are checked before the upgrade, so a bad token is refused
/// with a plain 401 instead of an open-then-closed socket. The token comes
/// from the `token` query parameter or an `Authorization: Bearer` header.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let token = match params.token.or_else(|| bearer_token(&headers)) {
        Some(t) => t,
        None => {
            return (StatusCode::UNAUTHORIZED, "Missing access token").into_response();
        }
    };

    let claims = match state.auth.verify_access_token(&token) {
        Ok(c) => c,
        Err(_) => {
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    };

    let actor_id = match ObjectId::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => {
            return (StatusCode::UNAUTHORIZED, "Invalid token subject").into_response();
        }
    };

    let role = match ChatRole::parse(&claims.role) {
        Some(r) => r,
        None => {
            return (StatusCode::UNAUTHORIZED, "Invalid token role").into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, actor_id, role))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

async fn handle_socket(socket: WebSocket, state: AppState, actor_id: ObjectId, role: ChatRole) {
    let connection_id = Uuid::new_v4().to_string();
    let channel = channel_name(role, &actor_id);
    info!(%channel, %connection_id, "WebSocket connected");

    let (sender, mut receiver) = socket.split();
    let sender = Arc::new(Mutex::new(sender));

    state
        .ws_storage
        .join(channel.clone(), connection_id.clone(), sender.clone());

    {
        let msg = serde_json::json!({
            "type": "connected",
            "channel": channel,
        });
        let text = serde_json::to_string(&msg).unwrap_or_default();
        let mut guard = sender.lock().await;
        let _ = guard.send(Message::text(text)).await;
    }

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_client_message(&sender, &text).await;
            }
            Ok(Message::Ping(data)) => {
                let mut guard = sender.lock().await;
                let _ = guard.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => {
                break;
            }
            Err(e) => {
                warn!(%channel, %connection_id, %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    state.ws_storage.leave(&channel, &connection_id, &sender);
    info!(%channel, %connection_id, "WebSocket disconnected");
}

/// Chat delivery is push-only; the only client frame honored is the
/// keepalive ping.
async fn handle_client_message(sender: &WsSender, text: &str) {
    let parsed: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return,
    };

    if parsed.get("type").and_then(|t| t.as_str()) == Some("ping") {
        let pong = serde_json::json!({ "type": "pong" });
        let text = serde_json::to_string(&pong).unwrap_or_default();
        let mut guard = sender.lock().await;
        let _ = guard.send(Message::text(text)).await;
    }
}
