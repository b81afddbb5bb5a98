//! Handlers for `/notifications` endpoints. Every handler acts on the
//! caller's own notifications only.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/notifications` | Optional `?unread_only=true`; body carries `unread_count` |
//! | `POST`   | `/notifications/{id}/read` | 204; 404 if not the caller's |
//! | `POST`   | `/notifications/read-all` | Body: `{"updated": n}` |
//! | `DELETE` | `/notifications/{id}` | 204; 404 if not the caller's |

use std::sync::Arc;

use agrifusion_core::{
  backend::Backend,
  notification::{MarkAllRead, NotificationList},
};
use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
  http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{auth::Caller, error::ApiError};

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
  Uuid::parse_str(raw)
    .map_err(|_| ApiError::BadRequest(format!("invalid notification id: {raw:?}")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// If `true`, read notifications are left out of the list.
  #[serde(default)]
  pub unread_only: bool,
}

/// `GET /notifications[?unread_only=true]`
pub async fn list<B>(
  State(backend): State<Arc<B>>,
  caller: Caller,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<NotificationList>, ApiError>
where
  B: Backend + 'static,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

  let mut notifications = backend
    .notifications_for(caller.profile.id)
    .await
    .map_err(|e| ApiError::Backend(Box::new(e)))?;

  if params.unread_only {
    notifications.retain(|n| !n.is_read);
  }

  Ok(Json(NotificationList::from(notifications)))
}

// ─── Mark read ────────────────────────────────────────────────────────────────

/// `POST /notifications/{id}/read`
pub async fn mark_read<B>(
  State(backend): State<Arc<B>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  B: Backend + 'static,
{
  let id = parse_id(&id)?;
  let found = backend
    .mark_notification_read(caller.profile.id, id)
    .await
    .map_err(|e| ApiError::Backend(Box::new(e)))?;

  if !found {
    return Err(ApiError::NotFound(format!("notification {id} not found")));
  }

  tracing::debug!(profile_id = %caller.profile.id, notification_id = %id, "notification marked read");
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /notifications/read-all`
pub async fn mark_all_read<B>(
  State(backend): State<Arc<B>>,
  caller: Caller,
) -> Result<Json<MarkAllRead>, ApiError>
where
  B: Backend + 'static,
{
  let updated = backend
    .mark_all_notifications_read(caller.profile.id)
    .await
    .map_err(|e| ApiError::Backend(Box::new(e)))?;

  tracing::info!(profile_id = %caller.profile.id, updated, "all notifications marked read");
  Ok(Json(MarkAllRead { updated }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /notifications/{id}`
pub async fn delete_one<B>(
  State(backend): State<Arc<B>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  B: Backend + 'static,
{
  let id = parse_id(&id)?;
  let found = backend
    .delete_notification(caller.profile.id, id)
    .await
    .map_err(|e| ApiError::Backend(Box::new(e)))?;

  if !found {
    return Err(ApiError::NotFound(format!("notification {id} not found")));
  }

  tracing::info!(profile_id = %caller.profile.id, notification_id = %id, "notification deleted");
  Ok(StatusCode::NO_CONTENT)
}
