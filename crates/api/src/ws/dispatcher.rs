use futures::SinkExt;
use axum::extract::ws::Message;
use tracing::{debug, warn};

use super::storage::WsStorage;

/// Broadcasts a JSON event to all connections on the given channels.
/// Delivery is best effort: a dead socket is logged and skipped, and the
/// caller never sees the failure.
pub async fn broadcast(
    ws_storage: &WsStorage,
    channels: &[String],
    message: &serde_json::Value,
) {
    let text = serde_json::to_string(message).unwrap_or_default();

    for channel in channels {
        let senders = ws_storage.channel_senders(channel);
        for sender in senders {
            let text = text.clone();
            let mut guard = sender.lock().await;
            if let Err(e) = guard.send(Message::text(text)).await {
                warn!(%channel, %e, "Failed to send WS message");
            } else {
                debug!(%channel, "WS message sent");
            }
        }
    }
}
