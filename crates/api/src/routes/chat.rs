use axum::{Json, extract::{Path, Query, State}, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extractors::auth::AuthActor, state::AppState};
use crate::ws::storage::channel_name;
use pawcare_db::models::{ChatMessage, ChatRole};
use pawcare_services::dao::base::PaginationParams;
use pawcare_services::dao::chat::{ChatContact, ConversationSummary};

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
    pub participant_role: Option<ChatRole>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageQuery {
    pub participant_role: Option<ChatRole>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    pub participant_role: Option<ChatRole>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub content: String,
    pub sender_id: String,
    pub sender_role: String,
    pub receiver_id: String,
    pub receiver_role: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub participant_id: String,
    pub participant_role: String,
    pub participant_name: String,
    pub participant_image: Option<String>,
    pub participant_subtitle: Option<String>,
    pub last_message: String,
    pub last_message_at: String,
    pub last_message_sender_id: String,
    pub last_message_sender_role: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub participant_id: String,
    pub participant_role: String,
    pub name: String,
    pub image_url: Option<String>,
    pub subtitle: Option<String>,
}

pub async fn conversations(
    State(state): State<AppState>,
    auth: AuthActor,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);

    let result = state
        .chat
        .find_conversations(auth.id, auth.role, page, limit)
        .await?;

    let items: Vec<ConversationResponse> = result
        .items
        .into_iter()
        .map(to_conversation_response)
        .collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Conversations fetched",
        "data": {
            "conversations": items,
            "total": result.total,
            "page": result.page,
            "limit": result.limit,
            "total_pages": result.total_pages,
        }
    })))
}

pub async fn conversation_messages(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(participant_id): Path<String>,
    Query(params): Query<ThreadQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let participant_role = params.participant_role.unwrap_or(auth.role.opposite());
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(50);

    let result = state
        .chat
        .find_conversation_messages(
            auth.id,
            auth.role,
            &participant_id,
            participant_role,
            page,
            limit,
        )
        .await?;

    let items: Vec<ChatMessageResponse> = result
        .items
        .into_iter()
        .map(to_message_response)
        .collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Conversation messages fetched",
        "data": {
            "messages": items,
            "total": result.total,
            "page": result.page,
            "limit": result.limit,
            "total_pages": result.total_pages,
        }
    })))
}

pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthActor,
    Path(participant_id): Path<String>,
    Query(query): Query<CreateMessageQuery>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let participant_role = body
        .participant_role
        .or(query.participant_role)
        .unwrap_or(auth.role.opposite());

    let message = state
        .chat
        .create_message(
            auth.id,
            auth.role,
            &participant_id,
            participant_role,
            &body.content,
        )
        .await?;

    // Push to both parties over WebSocket. The write has already committed,
    // so delivery problems are the dispatcher's to log, not this handler's
    // to surface.
    let channels = [
        channel_name(message.sender_role, &message.sender_id),
        channel_name(message.receiver_role, &message.receiver_id),
    ];
    let response = to_message_response(message);
    let event = serde_json::json!({
        "type": "chat:message",
        "data": &response,
    });
    crate::ws::dispatcher::broadcast(&state.ws_storage, &channels, &event).await;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Message sent",
            "data": response,
        })),
    ))
}

pub async fn contacts(
    State(state): State<AppState>,
    auth: AuthActor,
) -> Result<Json<serde_json::Value>, ApiError> {
    let contacts = state.chat.find_contacts(auth.id, auth.role).await?;
    let items: Vec<ContactResponse> = contacts.into_iter().map(to_contact_response).collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Chat contacts fetched",
        "data": items,
    })))
}

fn to_message_response(m: ChatMessage) -> ChatMessageResponse {
    ChatMessageResponse {
        id: m.id.unwrap().to_hex(),
        content: m.content,
        sender_id: m.sender_id.to_hex(),
        sender_role: m.sender_role.as_str().to_string(),
        receiver_id: m.receiver_id.to_hex(),
        receiver_role: m.receiver_role.as_str().to_string(),
        created_at: m.created_at.try_to_rfc3339_string().unwrap_or_default(),
        updated_at: m.updated_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

fn to_conversation_response(c: ConversationSummary) -> ConversationResponse {
    ConversationResponse {
        participant_id: c.participant_id.to_hex(),
        participant_role: c.participant_role.as_str().to_string(),
        participant_name: c.participant_name,
        participant_image: c.participant_image,
        participant_subtitle: c.participant_subtitle,
        last_message: c.last_message,
        last_message_at: c.last_message_at.try_to_rfc3339_string().unwrap_or_default(),
        last_message_sender_id: c.last_message_sender_id.to_hex(),
        last_message_sender_role: c.last_message_sender_role.as_str().to_string(),
    }
}

fn to_contact_response(c: ChatContact) -> ContactResponse {
    ContactResponse {
        participant_id: c.participant_id.to_hex(),
        participant_role: c.participant_role.as_str().to_string(),
        name: c.name,
        image_url: c.image_url,
        subtitle: c.subtitle,
    }
}
