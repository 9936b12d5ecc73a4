use std::sync::Arc;

use mongodb::Database;

use pawcare_config::Settings;
use pawcare_services::auth::AuthService;
use pawcare_services::chat::ChatService;

use crate::ws::storage::WsStorage;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub auth: Arc<AuthService>,
    pub ws_storage: Arc<WsStorage>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: &Database, settings: Settings) -> Self {
        Self {
            chat: Arc::new(ChatService::new(db)),
            auth: Arc::new(AuthService::new(&settings.auth.jwt_secret)),
            ws_storage: Arc::new(WsStorage::new()),
            settings: Arc::new(settings),
        }
    }
}
