//! JSON REST API for AgriFusion.
//!
//! Exposes an axum [`Router`] backed by any [`agrifusion_core::backend::Backend`].
//! Callers authenticate with `Authorization: Bearer <token>`; TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", agrifusion_api::api_router(backend.clone()))
//! ```

pub mod auth;
pub mod error;
pub mod farmers;
pub mod notifications;
pub mod profile;

use std::sync::Arc;

use agrifusion_core::backend::Backend;
use axum::{
  Router,
  routing::{delete, get, post},
};

pub use auth::Caller;
pub use error::ApiError;

/// Build a fully-materialised API router for `backend`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<B>(backend: Arc<B>) -> Router<()>
where
  B: Backend + 'static,
{
  Router::new()
    // Profile
    .route("/me", get(profile::me))
    // Farmers
    .route("/farmers/filters", get(farmers::filters::<B>))
    // Notifications
    .route("/notifications", get(notifications::list::<B>))
    .route("/notifications/read-all", post(notifications::mark_all_read::<B>))
    .route("/notifications/{id}", delete(notifications::delete_one::<B>))
    .route("/notifications/{id}/read", post(notifications::mark_read::<B>))
    .with_state(backend)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use agrifusion_core::{
    farmer::NewFarmer,
    filters::FarmerFilters,
    notification::{MarkAllRead, NewNotification, NotificationList, NotificationType},
    profile::{NewProfile, Profile, ProfileStatus, ProfileSummary, Role},
  };
  use agrifusion_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde::de::DeserializeOwned;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  async fn store() -> SqliteStore { SqliteStore::open_in_memory().await.unwrap() }

  /// Insert a profile and return it with a fresh token for its owner.
  async fn user(store: &SqliteStore, role: Role, status: ProfileStatus) -> (Profile, String) {
    let profile = store.insert_profile(NewProfile::new(role, status)).await.unwrap();
    let token = store.issue_token(profile.auth_user_id, None).await.unwrap();
    (profile, token)
  }

  async fn send(
    store:  &SqliteStore,
    method: &str,
    uri:    &str,
    token:  Option<&str>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = builder.body(Body::empty()).unwrap();
    api_router(Arc::new(store.clone())).oneshot(req).await.unwrap()
  }

  async fn json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn error_message(resp: Response) -> String {
    let body: serde_json::Value = json(resp).await;
    body["error"].as_str().expect("error field").to_owned()
  }

  // ── Authentication ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_token_is_401_with_challenge() {
    let s = store().await;
    let resp = send(&s, "GET", "/farmers/filters", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    assert!(!error_message(resp).await.is_empty());
  }

  #[tokio::test]
  async fn unknown_token_is_401() {
    let s = store().await;
    let resp = send(&s, "GET", "/farmers/filters", Some("bogus")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn token_without_profile_is_404() {
    let s = store().await;
    let token = s.issue_token(Uuid::new_v4(), None).await.unwrap();
    let resp = send(&s, "GET", "/farmers/filters", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(resp).await, "profile not found");
  }

  // ── Filters ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn farmer_caller_is_403() {
    let s = store().await;
    let (_, token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let resp = send(&s, "GET", "/farmers/filters", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn consultant_sees_only_open_farmers() {
    let s = store().await;
    let (consultant, token) = user(&s, Role::Consultant, ProfileStatus::Approved).await;

    let farmers = [
      (ProfileStatus::Active, "Pune", "Maharashtra", vec!["Wheat"], None),
      (ProfileStatus::Active, "Pune", "Maharashtra", vec!["Rice"], Some(consultant.id)),
      (ProfileStatus::Pending, "Ludhiana", "Punjab", vec!["Wheat", "Maize"], None),
      (ProfileStatus::Rejected, "Kota", "Rajasthan", vec!["Mustard"], None),
      (ProfileStatus::Suspended, "Hassan", "Karnataka", vec!["Coffee"], None),
    ];
    for (status, district, state, crops, consultant_id) in farmers {
      let (profile, _) = user(&s, Role::Farmer, status).await;
      let mut farmer = NewFarmer::new(profile.id).located(district, state).growing(crops);
      farmer.consultant_id = consultant_id;
      s.insert_farmer(farmer).await.unwrap();
    }

    let resp = send(&s, "GET", "/farmers/filters", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let filters: FarmerFilters = json(resp).await;
    assert_eq!(filters.districts, vec!["Ludhiana", "Pune"]);
    assert_eq!(filters.states, vec!["Maharashtra", "Punjab"]);
    assert_eq!(filters.crops, vec!["Maize", "Wheat"]);
  }

  #[tokio::test]
  async fn pending_consultant_can_still_read_filters() {
    let s = store().await;
    let (_, token) = user(&s, Role::Consultant, ProfileStatus::Pending).await;
    let resp = send(&s, "GET", "/farmers/filters", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let filters: FarmerFilters = json(resp).await;
    assert_eq!(filters, FarmerFilters::default());
  }

  // ── Profile ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn me_reports_dashboard_access() {
    let s = store().await;
    let (profile, token) = user(&s, Role::Consultant, ProfileStatus::Pending).await;
    let resp = send(&s, "GET", "/me", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: ProfileSummary = json(resp).await;
    assert_eq!(summary.profile.id, profile.id);
    assert_eq!(
      summary.access,
      agrifusion_core::profile::DashboardAccess::AwaitingApproval
    );
  }

  // ── Notifications ──────────────────────────────────────────────────────────

  async fn notify(s: &SqliteStore, recipient: Uuid, title: &str) -> Uuid {
    s.insert_notification(NewNotification::new(recipient, NotificationType::Message, title))
      .await
      .unwrap()
      .id
  }

  async fn list(s: &SqliteStore, token: &str) -> NotificationList {
    let resp = send(s, "GET", "/notifications", Some(token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    json(resp).await
  }

  #[tokio::test]
  async fn mark_read_decrements_unread_count() {
    let s = store().await;
    let (me, token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let first = notify(&s, me.id, "one").await;
    notify(&s, me.id, "two").await;

    assert_eq!(list(&s, &token).await.unread_count, 2);

    let resp = send(&s, "POST", &format!("/notifications/{first}/read"), Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let after = list(&s, &token).await;
    assert_eq!(after.unread_count, 1);
    assert!(after.notifications.iter().find(|n| n.id == first).unwrap().is_read);
  }

  #[tokio::test]
  async fn unread_only_filters_list() {
    let s = store().await;
    let (me, token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let first = notify(&s, me.id, "one").await;
    notify(&s, me.id, "two").await;
    send(&s, "POST", &format!("/notifications/{first}/read"), Some(&token)).await;

    let resp = send(&s, "GET", "/notifications?unread_only=true", Some(&token)).await;
    let unread: NotificationList = json(resp).await;
    assert_eq!(unread.notifications.len(), 1);
    assert_eq!(unread.unread_count, 1);
    assert!(unread.notifications.iter().all(|n| n.id != first));
  }

  #[tokio::test]
  async fn mark_all_read_zeroes_unread_count() {
    let s = store().await;
    let (me, token) = user(&s, Role::Consultant, ProfileStatus::Approved).await;
    for title in ["a", "b", "c"] {
      notify(&s, me.id, title).await;
    }

    let resp = send(&s, "POST", "/notifications/read-all", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome: MarkAllRead = json(resp).await;
    assert_eq!(outcome.updated, 3);

    assert_eq!(list(&s, &token).await.unread_count, 0);
  }

  #[tokio::test]
  async fn delete_removes_and_then_404s() {
    let s = store().await;
    let (me, token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let id = notify(&s, me.id, "bye").await;

    let uri = format!("/notifications/{id}");
    assert_eq!(send(&s, "DELETE", &uri, Some(&token)).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(send(&s, "DELETE", &uri, Some(&token)).await.status(), StatusCode::NOT_FOUND);
    assert!(list(&s, &token).await.notifications.is_empty());
  }

  #[tokio::test]
  async fn cannot_touch_another_recipients_notification() {
    let s = store().await;
    let (owner, owner_token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let (_, other_token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let id = notify(&s, owner.id, "private").await;

    let read = send(&s, "POST", &format!("/notifications/{id}/read"), Some(&other_token)).await;
    assert_eq!(read.status(), StatusCode::NOT_FOUND);
    let del = send(&s, "DELETE", &format!("/notifications/{id}"), Some(&other_token)).await;
    assert_eq!(del.status(), StatusCode::NOT_FOUND);

    let mine = list(&s, &owner_token).await;
    assert_eq!(mine.notifications.len(), 1);
    assert_eq!(mine.unread_count, 1);
  }

  #[tokio::test]
  async fn malformed_id_is_400() {
    let s = store().await;
    let (_, token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let resp = send(&s, "POST", "/notifications/not-a-uuid/read", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(resp).await.contains("not-a-uuid"));
  }

  #[tokio::test]
  async fn malformed_unread_only_is_400_json() {
    let s = store().await;
    let (_, token) = user(&s, Role::Farmer, ProfileStatus::Active).await;
    let resp = send(&s, "GET", "/notifications?unread_only=yes", Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
      resp.headers()[header::CONTENT_TYPE],
      "application/json"
    );
    assert!(error_message(resp).await.contains("unread_only"));
  }
}
