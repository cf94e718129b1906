use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use chomp_types::{ClassData, NewClassData};

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    state::AppState,
};

/// Create a class with the caller as teacher
#[utoipa::path(
    post,
    path = "/classes",
    request_body = NewClassData,
    responses(
        (status = 201, description = "Class created", body = ClassData),
        (status = 400, description = "Missing name or too many participants", body = crate::error::ErrorBody),
        (status = 401, description = "Missing identity", body = crate::error::ErrorBody)
    ),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    teacher: AuthUser,
    ApiJson(req): ApiJson<NewClassData>,
) -> ApiResult<(StatusCode, Json<ClassData>)> {
    if !req.is_valid() {
        return Err(ApiError::ClassRequest);
    }

    let participants = req.roster_with_teacher(teacher.email());
    let class = state.store.create_class(req, participants).await?;

    tracing::info!(class_id = %class.id, participants = class.participants.len(), "Class created");
    Ok((StatusCode::CREATED, Json(class)))
}
