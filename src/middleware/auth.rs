//! Authentication middleware
//!
//! Bearer token checks for the HTTP layer. `require_auth` rejects requests
//! without a valid session, `optional_auth` attaches the caller when one is
//! present. Handlers take [`AuthUser`] (or `Option<AuthUser>`) as an extractor,
//! which reuses the identity attached by either middleware, or the failure
//! recorded by `optional_auth`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use crate::services::auth::AuthUser;
use crate::state::SharedState;
use crate::utils::errors::SocioError;

pub async fn require_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, SocioError> {
    let user = state.services.auth_service.authenticate(request.headers()).await?;
    debug!(user_id = %user.id, "Request authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Why `optional_auth` could not authenticate a request
#[derive(Debug, Clone)]
struct AuthFailure {
    service_error: bool,
    message: String,
}

impl From<&SocioError> for AuthFailure {
    fn from(err: &SocioError) -> Self {
        match err {
            SocioError::AuthService(message) => Self { service_error: true, message: message.clone() },
            other => Self { service_error: false, message: other.to_string() },
        }
    }
}

impl From<AuthFailure> for SocioError {
    fn from(failure: AuthFailure) -> Self {
        if failure.service_error {
            SocioError::AuthService(failure.message)
        } else {
            SocioError::Authentication(failure.message)
        }
    }
}

pub async fn optional_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.services.auth_service.authenticate(request.headers()).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(e) => {
            request.extensions_mut().insert(AuthFailure::from(&e));
        }
    }

    next.run(request).await
}

#[async_trait]
impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = SocioError;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        if let Some(failure) = parts.extensions.get::<AuthFailure>() {
            return Err(failure.clone().into());
        }

        let user = state.services.auth_service.authenticate(&parts.headers).await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
