use bson::oid::ObjectId;
use dashmap::DashMap;
use futures::stream::SplitSink;
use axum::extract::ws::{Message, WebSocket};
use std::sync::Arc;
use tokio::sync::Mutex;

use pawcare_db::models::ChatRole;

pub type WsSender = Arc<Mutex<SplitSink<WebSocket, Message>>>;

/// Canonical channel for an identity: `role:hex_id`. Role-qualified names
/// keep a user and a provider with colliding ids on separate channels.
pub fn channel_name(role: ChatRole, id: &ObjectId) -> String {
    format!("{}:{}", role.as_str(), id.to_hex())
}

/// Tracks all active WebSocket connections by channel and connection ID.
/// Each identity subscribes to exactly one channel, but may hold several
/// connections on it (multiple tabs/devices).
pub struct WsStorage {
    /// channel -> senders subscribed to it
    channels: DashMap<String, Vec<WsSender>>,
    /// connection_id -> (channel, sender) for cleanup on disconnect
    connection_map: DashMap<String, (String, WsSender)>,
}

impl WsStorage {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            connection_map: DashMap::new(),
        }
    }

    pub fn join(&self, channel: String, connection_id: String, sender: WsSender) {
        self.channels
            .entry(channel.clone())
            .or_default()
            .push(sender.clone());
        self.connection_map
            .insert(connection_id, (channel, sender));
    }

    pub fn leave(&self, channel: &str, connection_id: &str, sender: &WsSender) {
        if let Some(mut senders) = self.channels.get_mut(channel) {
            senders.retain(|s| !Arc::ptr_eq(s, sender));
            if senders.is_empty() {
                drop(senders);
                self.channels.remove(channel);
            }
        }
        self.connection_map.remove(connection_id);
    }

    pub fn channel_senders(&self, channel: &str) -> Vec<WsSender> {
        self.channels
            .get(channel)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn connection_count(&self) -> usize {
        self.connection_map.len()
    }
}

impl Default for WsStorage {
    fn default() -> Self {
        Self::new()
    }
}
