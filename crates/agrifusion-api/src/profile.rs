//! Handler for `GET /me`.

use agrifusion_core::profile::ProfileSummary;
use axum::Json;

use crate::auth::Caller;

/// `GET /me`: the caller's profile and the dashboard access it grants.
pub async fn me(caller: Caller) -> Json<ProfileSummary> {
  Json(ProfileSummary::from(caller.profile))
}
