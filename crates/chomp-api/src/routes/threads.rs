use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use chomp_types::{NewThreadData, ResolveThread, ThreadData};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ResolveThreadRequest {
    pub message_id: String,
}

/// Start a thread in one of the caller's classes
#[utoipa::path(
    post,
    path = "/threads",
    request_body = NewThreadData,
    responses(
        (status = 201, description = "Thread created", body = ThreadData),
        (status = 400, description = "Invalid title, body or tags", body = crate::error::ErrorBody),
        (status = 401, description = "Caller is not in the class", body = crate::error::ErrorBody),
        (status = 404, description = "Class not found", body = crate::error::ErrorBody)
    ),
    tag = "threads"
)]
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    author: AuthUser,
    ApiJson(req): ApiJson<NewThreadData>,
) -> ApiResult<(StatusCode, Json<ThreadData>)> {
    if !req.is_valid() {
        return Err(ApiError::ThreadRequest);
    }

    let thread = state.store.create_thread(author.email(), req).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

/// Close a thread by accepting one of its replies
#[utoipa::path(
    post,
    path = "/threads/{thread_id}/resolve",
    params(("thread_id" = String, Path, description = "Thread ID")),
    request_body = ResolveThreadRequest,
    responses(
        (status = 200, description = "Thread resolved", body = ThreadData),
        (status = 401, description = "Caller did not author the thread", body = crate::error::ErrorBody),
        (status = 404, description = "Thread or message not found", body = crate::error::ErrorBody)
    ),
    tag = "threads"
)]
pub async fn resolve_thread(
    State(state): State<Arc<AppState>>,
    author: AuthUser,
    Path(thread_id): Path<String>,
    ApiJson(req): ApiJson<ResolveThreadRequest>,
) -> ApiResult<Json<ThreadData>> {
    let thread = state
        .store
        .resolve_thread(
            author.email(),
            ResolveThread {
                thread_id,
                message_id: req.message_id,
            },
        )
        .await?;

    tracing::info!(thread_id = %thread.id, "Thread resolved");
    Ok(Json(thread))
}
