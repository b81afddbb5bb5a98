//! [`SqliteStore`], the SQLite implementation of [`Backend`].

use std::path::Path;

use chrono::{DateTime, SubsecRound as _, TimeDelta, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use agrifusion_core::{
  backend::Backend,
  farmer::{Farmer, FarmerListing, NewFarmer},
  notification::{NewNotification, Notification},
  profile::{NewProfile, Profile},
};

use crate::{
  Error, Result,
  encode::{
    RawFarmerListing, RawNotification, RawProfile, encode_crops, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
  session::{generate_token, hash_token},
};

/// Current time at the precision the store persists.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// An AgriFusion backend held in a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes used by seeding and tests ──────────────────────────────────────

  pub async fn insert_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      id:           input.id,
      auth_user_id: input.auth_user_id,
      role:         input.role,
      status:       input.status,
      full_name:    input.full_name,
      created_at:   now(),
    };

    let id_str        = encode_uuid(profile.id);
    let auth_user_str = encode_uuid(profile.auth_user_id);
    let role_str      = profile.role.as_str();
    let status_str    = profile.status.as_str();
    let full_name     = profile.full_name.clone();
    let at_str        = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (id, auth_user_id, role, status, full_name, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, auth_user_str, role_str, status_str, full_name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(profile)
  }

  pub async fn insert_farmer(&self, input: NewFarmer) -> Result<Farmer> {
    let farmer = Farmer {
      id:            input.id,
      profile_id:    input.profile_id,
      district:      input.district,
      state:         input.state,
      current_crops: input.current_crops,
      consultant_id: input.consultant_id,
    };

    let id_str         = encode_uuid(farmer.id);
    let profile_id_str = encode_uuid(farmer.profile_id);
    let district       = farmer.district.clone();
    let state          = farmer.state.clone();
    let crops_str      = encode_crops(&farmer.current_crops)?;
    let consultant_str = farmer.consultant_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO farmers (id, profile_id, district, state, current_crops, consultant_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, profile_id_str, district, state, crops_str, consultant_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(farmer)
  }

  pub async fn insert_notification(
    &self,
    input: NewNotification,
  ) -> Result<Notification> {
    let notification = Notification {
      id:           input.id,
      recipient_id: input.recipient_id,
      kind:         input.kind,
      title:        input.title,
      message:      input.message,
      is_read:      false,
      read_at:      None,
      created_at:   now(),
      priority:     input.priority,
      category:     input.category,
      metadata:     input.metadata,
    };

    let id_str        = encode_uuid(notification.id);
    let recipient_str = encode_uuid(notification.recipient_id);
    let kind_str      = notification.kind.as_str();
    let title         = notification.title.clone();
    let message       = notification.message.clone();
    let priority_str  = notification.priority.as_str();
    let category      = notification.category.clone();
    let metadata_str  = notification
      .metadata
      .as_ref()
      .map(serde_json::to_string)
      .transpose()?;
    let at_str        = encode_dt(notification.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notifications (
             id, recipient_id, type, title, message,
             priority, category, metadata, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            recipient_str,
            kind_str,
            title,
            message,
            priority_str,
            category,
            metadata_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(notification)
  }

  /// Mint a bearer token for `auth_user_id`, valid for `ttl` (forever if
  /// `None`). The plaintext token is returned once and never stored.
  pub async fn issue_token(
    &self,
    auth_user_id: Uuid,
    ttl: Option<TimeDelta>,
  ) -> Result<String> {
    let token = generate_token();
    let issued_at = now();

    let hash_str      = hash_token(&token);
    let auth_user_str = encode_uuid(auth_user_id);
    let at_str        = encode_dt(issued_at);
    let expires_str   = ttl.map(|ttl| encode_dt(issued_at + ttl));

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, auth_user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![hash_str, auth_user_str, at_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(token)
  }

  /// Look up a profile by its own id.
  pub async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {} FROM profiles WHERE id = ?1", RawProfile::COLUMNS),
            rusqlite::params![id_str],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  /// Issue a token for the owner of the profile `profile_id`.
  pub async fn issue_token_for_profile(
    &self,
    profile_id: Uuid,
    ttl: Option<TimeDelta>,
  ) -> Result<String> {
    let profile = self
      .get_profile(profile_id)
      .await?
      .ok_or(Error::ProfileNotFound(profile_id))?;
    self.issue_token(profile.auth_user_id, ttl).await
  }
}

// ─── Backend impl ────────────────────────────────────────────────────────────

impl Backend for SqliteStore {
  type Error = Error;

  // ── Authentication ────────────────────────────────────────────────────────

  async fn resolve_token(&self, token: &str) -> Result<Option<Uuid>> {
    let hash_str = hash_token(token);
    let now_str  = encode_dt(Utc::now());

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT auth_user_id FROM sessions
             WHERE token_hash = ?1
               AND (expires_at IS NULL OR expires_at > ?2)",
            rusqlite::params![hash_str, now_str],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|s| Uuid::parse_str(&s))
      .transpose()
      .map_err(Error::Uuid)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn profile_by_auth_user(&self, auth_user_id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(auth_user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM profiles WHERE auth_user_id = ?1",
              RawProfile::COLUMNS
            ),
            rusqlite::params![id_str],
            RawProfile::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  // ── Farmers ───────────────────────────────────────────────────────────────

  async fn unassigned_farmers(&self) -> Result<Vec<FarmerListing>> {
    let raws: Vec<RawFarmerListing> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             f.id, f.profile_id, f.district, f.state,
             f.current_crops, f.consultant_id,
             p.status
           FROM farmers f
           JOIN profiles p ON p.id = f.profile_id
           WHERE f.consultant_id IS NULL",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(RawFarmerListing {
              id:             row.get(0)?,
              profile_id:     row.get(1)?,
              district:       row.get(2)?,
              state:          row.get(3)?,
              current_crops:  row.get(4)?,
              consultant_id:  row.get(5)?,
              profile_status: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawFarmerListing::into_listing).collect()
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn notifications_for(&self, recipient_id: Uuid) -> Result<Vec<Notification>> {
    let recipient_str = encode_uuid(recipient_id);

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM notifications
           WHERE recipient_id = ?1
           ORDER BY created_at DESC, id",
          RawNotification::COLUMNS
        ))?;

        let rows = stmt
          .query_map(rusqlite::params![recipient_str], RawNotification::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn mark_notification_read(&self, recipient_id: Uuid, id: Uuid) -> Result<bool> {
    let recipient_str = encode_uuid(recipient_id);
    let id_str        = encode_uuid(id);
    let now_str       = encode_dt(Utc::now());

    let found = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE notifications SET is_read = 1, read_at = ?3
           WHERE id = ?1 AND recipient_id = ?2 AND is_read = 0",
          rusqlite::params![id_str, recipient_str, now_str],
        )?;
        if changed > 0 {
          return Ok(true);
        }

        // Either already read or not this recipient's.
        let exists = conn
          .query_row(
            "SELECT 1 FROM notifications WHERE id = ?1 AND recipient_id = ?2",
            rusqlite::params![id_str, recipient_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        Ok(exists)
      })
      .await?;

    Ok(found)
  }

  async fn mark_all_notifications_read(&self, recipient_id: Uuid) -> Result<usize> {
    let recipient_str = encode_uuid(recipient_id);
    let now_str       = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET is_read = 1, read_at = ?2
           WHERE recipient_id = ?1 AND is_read = 0",
          rusqlite::params![recipient_str, now_str],
        )?)
      })
      .await?;

    Ok(changed)
  }

  async fn delete_notification(&self, recipient_id: Uuid, id: Uuid) -> Result<bool> {
    let recipient_str = encode_uuid(recipient_id);
    let id_str        = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM notifications WHERE id = ?1 AND recipient_id = ?2",
          rusqlite::params![id_str, recipient_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
