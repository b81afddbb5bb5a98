//! Farmer records and the listing shape consumed by filter aggregation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::ProfileStatus;

/// A farmer's holding details. One-to-one with a [`Profile`](crate::profile::Profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Farmer {
  pub id:            Uuid,
  pub profile_id:    Uuid,
  pub district:      Option<String>,
  pub state:         Option<String>,
  #[serde(default)]
  pub current_crops: Vec<String>,
  /// Profile id of the assigned consultant; `None` while unassigned.
  pub consultant_id: Option<Uuid>,
}

impl Farmer {
  pub fn is_unassigned(&self) -> bool { self.consultant_id.is_none() }
}

/// A farmer joined with the status of its linked profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmerListing {
  #[serde(flatten)]
  pub farmer:         Farmer,
  pub profile_status: ProfileStatus,
}

impl FarmerListing {
  /// Unassigned and in a status consultants may pick up.
  pub fn is_open_for_assignment(&self) -> bool {
    self.farmer.is_unassigned() && self.profile_status.is_assignable()
  }
}

/// Input for creating a farmer record. Used by seeding and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFarmer {
  #[serde(default = "Uuid::new_v4")]
  pub id:            Uuid,
  pub profile_id:    Uuid,
  #[serde(default)]
  pub district:      Option<String>,
  #[serde(default)]
  pub state:         Option<String>,
  #[serde(default)]
  pub current_crops: Vec<String>,
  #[serde(default)]
  pub consultant_id: Option<Uuid>,
}

impl NewFarmer {
  pub fn new(profile_id: Uuid) -> Self {
    Self {
      id: Uuid::new_v4(),
      profile_id,
      district: None,
      state: None,
      current_crops: Vec::new(),
      consultant_id: None,
    }
  }

  pub fn located(
    mut self,
    district: impl Into<String>,
    state: impl Into<String>,
  ) -> Self {
    self.district = Some(district.into());
    self.state = Some(state.into());
    self
  }

  pub fn growing<I, C>(mut self, crops: I) -> Self
  where
    I: IntoIterator<Item = C>,
    C: Into<String>,
  {
    self.current_crops = crops.into_iter().map(Into::into).collect();
    self
  }

  pub fn assigned_to(mut self, consultant_id: Uuid) -> Self {
    self.consultant_id = Some(consultant_id);
    self
  }
}
