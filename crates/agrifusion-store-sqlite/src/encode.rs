//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 UTC strings with microsecond precision, UUIDs
//! hyphenated lowercase strings, crop lists and metadata compact JSON.
//! Enumerations use their wire names.

use agrifusion_core::{
  farmer::{Farmer, FarmerListing},
  notification::Notification,
  profile::Profile,
};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Fixed-width so that string comparison in SQL orders chronologically.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Crops ───────────────────────────────────────────────────────────────────

pub fn encode_crops(crops: &[String]) -> Result<String> {
  Ok(serde_json::to_string(crops)?)
}

pub fn decode_crops(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub id:           String,
  pub auth_user_id: String,
  pub role:         String,
  pub status:       String,
  pub full_name:    Option<String>,
  pub created_at:   String,
}

impl RawProfile {
  pub const COLUMNS: &'static str =
    "id, auth_user_id, role, status, full_name, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      auth_user_id: row.get(1)?,
      role:         row.get(2)?,
      status:       row.get(3)?,
      full_name:    row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:           decode_uuid(&self.id)?,
      auth_user_id: decode_uuid(&self.auth_user_id)?,
      role:         self.role.parse()?,
      status:       self.status.parse()?,
      full_name:    self.full_name,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `farmers` row joined with its profile's status.
pub struct RawFarmerListing {
  pub id:             String,
  pub profile_id:     String,
  pub district:       Option<String>,
  pub state:          Option<String>,
  pub current_crops:  String,
  pub consultant_id:  Option<String>,
  pub profile_status: String,
}

impl RawFarmerListing {
  pub fn into_listing(self) -> Result<FarmerListing> {
    let farmer = Farmer {
      id:            decode_uuid(&self.id)?,
      profile_id:    decode_uuid(&self.profile_id)?,
      district:      self.district,
      state:         self.state,
      current_crops: decode_crops(&self.current_crops)?,
      consultant_id: self.consultant_id.as_deref().map(decode_uuid).transpose()?,
    };

    Ok(FarmerListing {
      farmer,
      profile_status: self.profile_status.parse()?,
    })
  }
}

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub id:           String,
  pub recipient_id: String,
  pub kind:         String,
  pub title:        String,
  pub message:      String,
  pub is_read:      bool,
  pub read_at:      Option<String>,
  pub priority:     String,
  pub category:     Option<String>,
  pub metadata:     Option<String>,
  pub created_at:   String,
}

impl RawNotification {
  pub const COLUMNS: &'static str = "id, recipient_id, type, title, message, \
                                     is_read, read_at, priority, category, \
                                     metadata, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      recipient_id: row.get(1)?,
      kind:         row.get(2)?,
      title:        row.get(3)?,
      message:      row.get(4)?,
      is_read:      row.get(5)?,
      read_at:      row.get(6)?,
      priority:     row.get(7)?,
      category:     row.get(8)?,
      metadata:     row.get(9)?,
      created_at:   row.get(10)?,
    })
  }

  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:           decode_uuid(&self.id)?,
      recipient_id: decode_uuid(&self.recipient_id)?,
      kind:         self.kind.parse()?,
      title:        self.title,
      message:      self.message,
      is_read:      self.is_read,
      read_at:      self.read_at.as_deref().map(decode_dt).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
      priority:     self.priority.parse()?,
      category:     self.category,
      metadata:     self
        .metadata
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?,
    })
  }
}
