use axum::{extract::FromRequestParts, http::request::Parts};
use bson::oid::ObjectId;

use pawcare_db::models::ChatRole;

use crate::{error::ApiError, state::AppState};

/// The authenticated identity behind a request. `id` alone is ambiguous
/// across the two account collections, so the role rides along everywhere.
#[derive(Debug, Clone, Copy)]
pub struct AuthActor {
    pub id: ObjectId,
    pub role: ChatRole,
}

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Missing access token".to_string()))?;

        let claims = state.auth.verify_access_token(token)?;

        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;
        let role = ChatRole::parse(&claims.role)
            .ok_or_else(|| ApiError::Unauthorized("Invalid token role".to_string()))?;

        Ok(AuthActor { id, role })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}
