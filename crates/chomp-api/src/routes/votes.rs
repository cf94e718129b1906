use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use chomp_types::{Vote, VoteList, VoteTarget};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CastVotesRequest {
    /// The caller's complete vote list; it replaces the stored one
    #[serde(default)]
    #[schema(value_type = Vec<Vote>)]
    pub votes: VoteList,
}

/// Replace the caller's thread votes
#[utoipa::path(
    put,
    path = "/votes/threads",
    request_body = CastVotesRequest,
    responses(
        (status = 202, description = "Votes stored, scores update asynchronously"),
        (status = 400, description = "Malformed list or a target appears more than once", body = crate::error::ErrorBody),
        (status = 401, description = "Missing identity", body = crate::error::ErrorBody)
    ),
    tag = "votes"
)]
pub async fn cast_thread_votes(
    State(state): State<Arc<AppState>>,
    voter: AuthUser,
    payload: Result<Json<CastVotesRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    cast_votes(&state, VoteTarget::Thread, &voter, payload).await
}

/// Replace the caller's message votes
#[utoipa::path(
    put,
    path = "/votes/messages",
    request_body = CastVotesRequest,
    responses(
        (status = 202, description = "Votes stored, scores update asynchronously"),
        (status = 400, description = "Malformed list or a target appears more than once", body = crate::error::ErrorBody),
        (status = 401, description = "Missing identity", body = crate::error::ErrorBody)
    ),
    tag = "votes"
)]
pub async fn cast_message_votes(
    State(state): State<Arc<AppState>>,
    voter: AuthUser,
    payload: Result<Json<CastVotesRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    cast_votes(&state, VoteTarget::Message, &voter, payload).await
}

async fn cast_votes(
    state: &AppState,
    target: VoteTarget,
    voter: &AuthUser,
    payload: Result<Json<CastVotesRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(CastVotesRequest { votes }) =
        payload.map_err(|rejection| ApiError::VoteRequest(rejection.body_text()))?;
    if let Some(id) = votes.first_duplicate() {
        return Err(ApiError::VoteRequest(format!("{target} {id} is voted on more than once")));
    }

    let change = state.store.replace_votes(target, voter.email(), votes).await?;
    state.votes.publish(change).await;
    Ok(StatusCode::ACCEPTED)
}
