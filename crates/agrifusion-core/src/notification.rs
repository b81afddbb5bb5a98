//! Notifications delivered to a profile.
//!
//! Notifications are created by backend-side triggers. Clients only ever move
//! them from unread to read, or delete them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Type ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
  /// A farmer asked a consultant to take them on.
  ConsultantRequest,
  /// Sent to a farmer when a consultant is assigned.
  ConsultantAssigned,
  /// Sent to a consultant when a farmer is assigned to them.
  FarmerAssigned,
  ApprovalGranted,
  ApprovalRejected,
  AccountSuspended,
  Message,
  System,
}

impl NotificationType {
  pub fn as_str(self) -> &'static str {
    match self {
      NotificationType::ConsultantRequest => "consultant_request",
      NotificationType::ConsultantAssigned => "consultant_assigned",
      NotificationType::FarmerAssigned => "farmer_assigned",
      NotificationType::ApprovalGranted => "approval_granted",
      NotificationType::ApprovalRejected => "approval_rejected",
      NotificationType::AccountSuspended => "account_suspended",
      NotificationType::Message => "message",
      NotificationType::System => "system",
    }
  }
}

impl fmt::Display for NotificationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for NotificationType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "consultant_request" => Ok(NotificationType::ConsultantRequest),
      "consultant_assigned" => Ok(NotificationType::ConsultantAssigned),
      "farmer_assigned" => Ok(NotificationType::FarmerAssigned),
      "approval_granted" => Ok(NotificationType::ApprovalGranted),
      "approval_rejected" => Ok(NotificationType::ApprovalRejected),
      "account_suspended" => Ok(NotificationType::AccountSuspended),
      "message" => Ok(NotificationType::Message),
      "system" => Ok(NotificationType::System),
      other => Err(Error::UnknownNotificationType(other.to_owned())),
    }
  }
}

// ─── Priority ────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
  Low,
  #[default]
  Normal,
  High,
  Urgent,
}

impl Priority {
  pub fn as_str(self) -> &'static str {
    match self {
      Priority::Low => "low",
      Priority::Normal => "normal",
      Priority::High => "high",
      Priority::Urgent => "urgent",
    }
  }
}

impl FromStr for Priority {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "low" => Ok(Priority::Low),
      "normal" => Ok(Priority::Normal),
      "high" => Ok(Priority::High),
      "urgent" => Ok(Priority::Urgent),
      other => Err(Error::UnknownPriority(other.to_owned())),
    }
  }
}

// ─── Notification ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub id:           Uuid,
  /// Profile id of the recipient.
  pub recipient_id: Uuid,
  #[serde(rename = "type")]
  pub kind:         NotificationType,
  pub title:        String,
  pub message:      String,
  pub is_read:      bool,
  pub read_at:      Option<DateTime<Utc>>,
  pub created_at:   DateTime<Utc>,
  #[serde(default)]
  pub priority:     Priority,
  pub category:     Option<String>,
  pub metadata:     Option<serde_json::Value>,
}

impl Notification {
  /// Move to the read state. A notification that is already read keeps its
  /// original `read_at`.
  pub fn mark_read(&mut self, at: DateTime<Utc>) {
    if !self.is_read {
      self.is_read = true;
      self.read_at = Some(at);
    }
  }
}

/// Number of unread notifications in `notifications`.
pub fn unread_count(notifications: &[Notification]) -> usize {
  notifications.iter().filter(|n| !n.is_read).count()
}

/// Input for creating a notification. Used by seeding and tests; in
/// production notifications come from backend triggers.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
  #[serde(default = "Uuid::new_v4")]
  pub id:           Uuid,
  pub recipient_id: Uuid,
  #[serde(rename = "type")]
  pub kind:         NotificationType,
  pub title:        String,
  #[serde(default)]
  pub message:      String,
  #[serde(default)]
  pub priority:     Priority,
  #[serde(default)]
  pub category:     Option<String>,
  #[serde(default)]
  pub metadata:     Option<serde_json::Value>,
}

impl NewNotification {
  pub fn new(
    recipient_id: Uuid,
    kind: NotificationType,
    title: impl Into<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      recipient_id,
      kind,
      title: title.into(),
      message: String::new(),
      priority: Priority::default(),
      category: None,
      metadata: None,
    }
  }

  pub fn with_priority(mut self, priority: Priority) -> Self {
    self.priority = priority;
    self
  }
}

// ─── Wire bodies ─────────────────────────────────────────────────────────────

/// Body of `GET /notifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationList {
  pub notifications: Vec<Notification>,
  pub unread_count:  usize,
}

impl From<Vec<Notification>> for NotificationList {
  fn from(notifications: Vec<Notification>) -> Self {
    let unread_count = unread_count(&notifications);
    Self { notifications, unread_count }
  }
}

/// Body of `POST /notifications/read-all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAllRead {
  pub updated: usize,
}
