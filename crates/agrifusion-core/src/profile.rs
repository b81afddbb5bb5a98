//! Profiles: the identity, role and approval status of a platform user.
//!
//! Profiles are owned by the backend. Nothing in this workspace mutates them
//! outside of seeding; handlers only read them to authorise a caller.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Role ────────────────────────────────────────────────────────────────────

/// Which dashboard a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Farmer,
  Consultant,
}

impl Role {
  pub fn as_str(self) -> &'static str {
    match self {
      Role::Farmer => "farmer",
      Role::Consultant => "consultant",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "farmer" => Ok(Role::Farmer),
      "consultant" => Ok(Role::Consultant),
      other => Err(Error::UnknownRole(other.to_owned())),
    }
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Approval status of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
  Pending,
  Approved,
  Rejected,
  Suspended,
  Active,
}

impl ProfileStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      ProfileStatus::Pending => "pending",
      ProfileStatus::Approved => "approved",
      ProfileStatus::Rejected => "rejected",
      ProfileStatus::Suspended => "suspended",
      ProfileStatus::Active => "active",
    }
  }

  /// Whether a farmer with this status may be offered to consultants.
  pub fn is_assignable(self) -> bool {
    match self {
      ProfileStatus::Pending | ProfileStatus::Active => true,
      ProfileStatus::Approved
      | ProfileStatus::Rejected
      | ProfileStatus::Suspended => false,
    }
  }
}

impl fmt::Display for ProfileStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ProfileStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(ProfileStatus::Pending),
      "approved" => Ok(ProfileStatus::Approved),
      "rejected" => Ok(ProfileStatus::Rejected),
      "suspended" => Ok(ProfileStatus::Suspended),
      "active" => Ok(ProfileStatus::Active),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:           Uuid,
  /// Identity assigned by the authentication service.
  pub auth_user_id: Uuid,
  pub role:         Role,
  pub status:       ProfileStatus,
  pub full_name:    Option<String>,
  pub created_at:   DateTime<Utc>,
}

impl Profile {
  /// Decide which dashboard view this profile may enter.
  pub fn dashboard_access(&self) -> DashboardAccess {
    match (self.role, self.status) {
      (_, ProfileStatus::Rejected) => DashboardAccess::Rejected,
      (_, ProfileStatus::Suspended) => DashboardAccess::Suspended,
      (Role::Consultant, ProfileStatus::Pending) => {
        DashboardAccess::AwaitingApproval
      }
      (Role::Farmer, ProfileStatus::Pending)
      | (_, ProfileStatus::Approved)
      | (_, ProfileStatus::Active) => DashboardAccess::Granted,
    }
  }
}

/// Input for creating a profile. Used by seeding and tests; the hosted
/// platform creates profiles during sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfile {
  #[serde(default = "Uuid::new_v4")]
  pub id:           Uuid,
  #[serde(default = "Uuid::new_v4")]
  pub auth_user_id: Uuid,
  pub role:         Role,
  pub status:       ProfileStatus,
  #[serde(default)]
  pub full_name:    Option<String>,
}

impl NewProfile {
  /// A profile with fresh ids and no name.
  pub fn new(role: Role, status: ProfileStatus) -> Self {
    Self {
      id: Uuid::new_v4(),
      auth_user_id: Uuid::new_v4(),
      role,
      status,
      full_name: None,
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.full_name = Some(name.into());
    self
  }
}

// ─── Dashboard access ────────────────────────────────────────────────────────

/// The outcome of the approval gate in front of the dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardAccess {
  Granted,
  /// Consultants wait for an administrator before they can see farmers.
  AwaitingApproval,
  Rejected,
  Suspended,
}

/// Body of `GET /me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
  pub profile: Profile,
  pub access:  DashboardAccess,
}

impl From<Profile> for ProfileSummary {
  fn from(profile: Profile) -> Self {
    let access = profile.dashboard_access();
    Self { profile, access }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn profile(role: Role, status: ProfileStatus) -> Profile {
    Profile {
      id: Uuid::new_v4(),
      auth_user_id: Uuid::new_v4(),
      role,
      status,
      full_name: None,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn pending_consultant_awaits_approval() {
    let p = profile(Role::Consultant, ProfileStatus::Pending);
    assert_eq!(p.dashboard_access(), DashboardAccess::AwaitingApproval);
  }

  #[test]
  fn pending_farmer_is_granted() {
    let p = profile(Role::Farmer, ProfileStatus::Pending);
    assert_eq!(p.dashboard_access(), DashboardAccess::Granted);
  }

  #[test]
  fn rejected_and_suspended_apply_to_both_roles() {
    for role in [Role::Farmer, Role::Consultant] {
      assert_eq!(
        profile(role, ProfileStatus::Rejected).dashboard_access(),
        DashboardAccess::Rejected
      );
      assert_eq!(
        profile(role, ProfileStatus::Suspended).dashboard_access(),
        DashboardAccess::Suspended
      );
    }
  }

  #[test]
  fn only_pending_and_active_are_assignable() {
    assert!(ProfileStatus::Pending.is_assignable());
    assert!(ProfileStatus::Active.is_assignable());
    assert!(!ProfileStatus::Approved.is_assignable());
    assert!(!ProfileStatus::Rejected.is_assignable());
    assert!(!ProfileStatus::Suspended.is_assignable());
  }

  #[test]
  fn status_parses_its_own_display() {
    for status in [
      ProfileStatus::Pending,
      ProfileStatus::Approved,
      ProfileStatus::Rejected,
      ProfileStatus::Suspended,
      ProfileStatus::Active,
    ] {
      assert_eq!(status.to_string().parse::<ProfileStatus>().unwrap(), status);
    }
    assert!(matches!(
      "archived".parse::<ProfileStatus>(),
      Err(Error::UnknownStatus(s)) if s == "archived"
    ));
  }

  #[test]
  fn summary_serialises_access_in_snake_case() {
    let summary =
      ProfileSummary::from(profile(Role::Consultant, ProfileStatus::Pending));
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["access"], "awaiting_approval");
    assert_eq!(json["profile"]["role"], "consultant");
  }
}
