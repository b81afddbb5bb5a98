//! The `Backend` trait: everything the service needs from the hosted
//! database and authentication platform.
//!
//! The trait is implemented by storage backends (e.g.
//! `agrifusion-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend. Row-level authorisation is the backend's job:
//! every notification method is scoped to a recipient and never touches rows
//! belonging to anyone else.

use std::future::Future;

use uuid::Uuid;

use crate::{farmer::FarmerListing, notification::Notification, profile::Profile};

/// Abstraction over the managed data and authentication services.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Backend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Authentication ────────────────────────────────────────────────────

  /// Resolve a bearer token to the authentication user id it was issued for.
  /// Returns `None` for unknown or expired tokens.
  fn resolve_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + 'a;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Look up the profile owned by an authentication user.
  fn profile_by_auth_user(
    &self,
    auth_user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  // ── Farmers ───────────────────────────────────────────────────────────

  /// All farmers with no consultant, each joined with its profile status.
  fn unassigned_farmers(
    &self,
  ) -> impl Future<Output = Result<Vec<FarmerListing>, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// Notifications addressed to `recipient_id`, newest first.
  fn notifications_for(
    &self,
    recipient_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Mark one notification read. Returns `false` if no notification with
  /// that id belongs to `recipient_id`. Already-read notifications are left
  /// untouched and report `true`.
  fn mark_notification_read(
    &self,
    recipient_id: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Mark every unread notification of `recipient_id` read. Returns how many
  /// changed.
  fn mark_all_notifications_read(
    &self,
    recipient_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete one notification. Returns `false` if no notification with that id
  /// belongs to `recipient_id`.
  fn delete_notification(
    &self,
    recipient_id: Uuid,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
