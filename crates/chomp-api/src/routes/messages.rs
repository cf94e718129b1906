use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use chomp_types::{MessageData, NewMessageData};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

/// Reply in a thread
#[utoipa::path(
    post,
    path = "/messages",
    request_body = NewMessageData,
    responses(
        (status = 201, description = "Message created", body = MessageData),
        (status = 400, description = "Missing ids or message too long", body = crate::error::ErrorBody),
        (status = 401, description = "Caller is not in the class", body = crate::error::ErrorBody),
        (status = 404, description = "Class or thread not found", body = crate::error::ErrorBody)
    ),
    tag = "messages"
)]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    author: AuthUser,
    ApiJson(req): ApiJson<NewMessageData>,
) -> ApiResult<(StatusCode, Json<MessageData>)> {
    if !req.is_valid() {
        return Err(ApiError::MessageRequest);
    }

    let message = state.store.create_message(author.email(), req).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
