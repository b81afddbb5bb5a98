//! Loading fixture data into a local store.
//!
//! The hosted platform populates profiles, farmers and notifications through
//! its own flows. Locally they come from a JSON file:
//!
//! ```json
//! {
//!   "profiles":      [{ "id": "…", "role": "consultant", "status": "approved" }],
//!   "farmers":       [{ "profile_id": "…", "district": "Pune", "current_crops": ["Wheat"] }],
//!   "notifications": [{ "recipient_id": "…", "type": "message", "title": "Welcome" }]
//! }
//! ```

use std::path::Path;

use agrifusion_core::{
  farmer::NewFarmer,
  notification::NewNotification,
  profile::NewProfile,
};
use agrifusion_store_sqlite::SqliteStore;
use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
  #[serde(default)]
  pub profiles:      Vec<NewProfile>,
  #[serde(default)]
  pub farmers:       Vec<NewFarmer>,
  #[serde(default)]
  pub notifications: Vec<NewNotification>,
}

/// How many rows of each kind were inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
  pub profiles:      usize,
  pub farmers:       usize,
  pub notifications: usize,
}

impl SeedData {
  pub fn from_file(path: &Path) -> anyhow::Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading seed file {}", path.display()))?;
    serde_json::from_str(&raw)
      .with_context(|| format!("parsing seed file {}", path.display()))
  }

  /// Insert everything, profiles first so farmers and notifications can
  /// reference them.
  pub async fn apply(self, store: &SqliteStore) -> anyhow::Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for profile in self.profiles {
      let id = profile.id;
      store
        .insert_profile(profile)
        .await
        .with_context(|| format!("inserting profile {id}"))?;
      summary.profiles += 1;
    }

    for farmer in self.farmers {
      let id = farmer.id;
      store
        .insert_farmer(farmer)
        .await
        .with_context(|| format!("inserting farmer {id}"))?;
      summary.farmers += 1;
    }

    for notification in self.notifications {
      let id = notification.id;
      store
        .insert_notification(notification)
        .await
        .with_context(|| format!("inserting notification {id}"))?;
      summary.notifications += 1;
    }

    tracing::info!(
      profiles = summary.profiles,
      farmers = summary.farmers,
      notifications = summary.notifications,
      "seed data applied"
    );
    Ok(summary)
  }
}
