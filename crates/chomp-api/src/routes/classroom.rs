use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use chomp_types::NewClassData;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FetchClassroomRequest {
    /// Google OAuth access token carrying the Classroom read scopes
    #[serde(default)]
    pub access_token: Option<String>,
}

/// List the caller's active Google Classroom courses as class requests
#[utoipa::path(
    post,
    path = "/classroom/classes",
    request_body = FetchClassroomRequest,
    responses(
        (status = 200, description = "Courses ready to submit to /classes", body = [NewClassData]),
        (status = 401, description = "Missing identity or access token", body = crate::error::ErrorBody),
        (status = 404, description = "No active courses", body = crate::error::ErrorBody)
    ),
    tag = "classroom"
)]
pub async fn fetch_classroom_classes(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<FetchClassroomRequest>,
) -> ApiResult<Json<Vec<NewClassData>>> {
    let access_token = req
        .access_token
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::Unauthenticated)?;

    let classes = state.classroom.fetch_classes(&access_token).await?;
    if classes.is_empty() {
        return Err(ApiError::EmptyResponse);
    }

    tracing::info!(user = %user.email(), classes = classes.len(), "Fetched Classroom classes");
    Ok(Json(classes))
}
