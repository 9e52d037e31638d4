use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// The caller's identity as established by the upstream gateway.
///
/// Authentication itself is an external collaborator: the gateway verifies
/// the session and installs `x-user-id` / `x-user-role` headers before the
/// request reaches this service. Requests without an identity are rejected
/// before any project operation runs.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub role: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .ok_or_else(|| ApiError::unauthorized("you are not logged in"))?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("user")
            .to_string();

        Ok(Self { id, role })
    }
}
