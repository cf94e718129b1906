use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chomp_types::normalize_email;

use crate::{error::ApiError, state::AppState};

/// Email of the caller, as verified by the identity gateway.
///
/// Read from the header named by `auth.email_header`. A missing or blank
/// header rejects the request with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl AuthUser {
    pub fn email(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let header = state.config.auth.email_header.as_str();
        let email = parts
            .headers
            .get(header)
            .and_then(|value| value.to_str().ok())
            .map(normalize_email)
            .filter(|email| !email.is_empty())
            .ok_or(ApiError::Unauthenticated)?;

        Ok(AuthUser(email))
    }
}
