//! Bearer-token extractor resolving the caller's profile.

use std::sync::Arc;

use agrifusion_core::{
  backend::Backend,
  profile::{Profile, Role},
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};

use crate::error::ApiError;

/// The authenticated caller. Present in a handler means the bearer token
/// resolved and the caller has a profile.
#[derive(Debug, Clone)]
pub struct Caller {
  pub profile: Profile,
}

impl Caller {
  /// Reject callers whose role is not `role`.
  pub fn require_role(&self, role: Role) -> Result<(), ApiError> {
    if self.profile.role == role {
      Ok(())
    } else {
      Err(ApiError::Forbidden(format!("{role} role required")))
    }
  }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  let value = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;

  let (scheme, token) = value
    .split_once(' ')
    .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".into()))?;

  if !scheme.eq_ignore_ascii_case("bearer") {
    return Err(ApiError::Unauthorized("expected a bearer token".into()));
  }

  let token = token.trim();
  if token.is_empty() {
    return Err(ApiError::Unauthorized("missing bearer token".into()));
  }
  Ok(token)
}

impl<B> FromRequestParts<Arc<B>> for Caller
where
  B: Backend + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    backend: &Arc<B>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;

    let auth_user_id = backend
      .resolve_token(token)
      .await
      .map_err(|e| ApiError::Backend(Box::new(e)))?
      .ok_or_else(|| ApiError::Unauthorized("invalid or expired token".into()))?;

    let profile = backend
      .profile_by_auth_user(auth_user_id)
      .await
      .map_err(|e| ApiError::Backend(Box::new(e)))?
      .ok_or_else(|| ApiError::NotFound("profile not found".into()))?;

    tracing::debug!(profile_id = %profile.id, role = %profile.role, "caller authenticated");
    Ok(Caller { profile })
  }
}
