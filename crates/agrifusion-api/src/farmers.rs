//! Handler for `GET /farmers/filters`.
//!
//! Consultant-only. Returns the distinct districts, states and crops of the
//! farmers still open for assignment, each list sorted ascending.

use std::sync::Arc;

use agrifusion_core::{
  backend::Backend,
  filters::{FarmerFilters, aggregate},
  profile::Role,
};
use axum::{Json, extract::State};

use crate::{auth::Caller, error::ApiError};

/// `GET /farmers/filters`
pub async fn filters<B>(
  State(backend): State<Arc<B>>,
  caller: Caller,
) -> Result<Json<FarmerFilters>, ApiError>
where
  B: Backend + 'static,
{
  caller.require_role(Role::Consultant)?;

  let listings = backend
    .unassigned_farmers()
    .await
    .map_err(|e| ApiError::Backend(Box::new(e)))?;

  let filters = aggregate(&listings);
  tracing::debug!(
    farmers = listings.len(),
    districts = filters.districts.len(),
    states = filters.states.len(),
    crops = filters.crops.len(),
    "aggregated farmer filters"
  );
  Ok(Json(filters))
}
