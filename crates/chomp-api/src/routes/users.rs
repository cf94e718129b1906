use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use chomp_types::{NewUser, UserProfile};

use crate::{auth::AuthUser, error::ApiResult, extract::ApiJson, state::AppState};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterUserRequest {
    pub uid: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Register the caller after sign-up
///
/// Claims the placeholder profile created when a teacher added this email
/// to a class, or creates a fresh profile.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 200, description = "Profile registered", body = UserProfile),
        (status = 401, description = "Missing identity or duplicate profiles", body = crate::error::ErrorBody)
    ),
    tag = "users"
)]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<RegisterUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state
        .store
        .register_user(NewUser {
            uid: req.uid,
            name: req.name,
            email: user.0,
        })
        .await?;

    tracing::info!(user_id = %profile.id, "User registered");
    Ok(Json(profile))
}
