//! Async HTTP client wrapping the AgriFusion JSON API.

use std::time::Duration;

use agrifusion_core::{
  filters::FarmerFilters,
  inbox::NotificationFeed,
  notification::{MarkAllRead, Notification, NotificationList},
  profile::ProfileSummary,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("{what} failed: {source}")]
  Http {
    what:   String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{what} → {status}: {message}")]
  Status {
    what:    String,
    status:  StatusCode,
    message: String,
  },
}

impl Error {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      Error::Status { status, .. } => Some(*status),
      Error::Build(_) | Error::Http { .. } => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Shape of every error body the API returns.
#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Connection settings for the AgriFusion API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    String,
}

/// Async HTTP client for the AgriFusion JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(Error::Build)?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  /// Send `req` and fail on any non-2xx status, carrying the API's message.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .map_err(|source| Error::Http { what: what.to_owned(), source })?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    let message = match resp.json::<ErrorBody>().await {
      Ok(body) => body.error,
      Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
    };
    tracing::debug!(%status, what, %message, "request rejected");
    Err(Error::Status { what: what.to_owned(), status, message })
  }

  async fn get_json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    self
      .send(req, what)
      .await?
      .json()
      .await
      .map_err(|source| Error::Http { what: what.to_owned(), source })
  }

  // ── Profile ───────────────────────────────────────────────────────────────

  /// `GET /api/me`
  pub async fn whoami(&self) -> Result<ProfileSummary> {
    self.get_json(self.client.get(self.url("/me")), "GET /me").await
  }

  // ── Farmers ───────────────────────────────────────────────────────────────

  /// `GET /api/farmers/filters`
  pub async fn farmer_filters(&self) -> Result<FarmerFilters> {
    self
      .get_json(
        self.client.get(self.url("/farmers/filters")),
        "GET /farmers/filters",
      )
      .await
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  /// `GET /api/notifications[?unread_only=true]`
  pub async fn notifications(&self, unread_only: bool) -> Result<NotificationList> {
    self
      .get_json(
        self
          .client
          .get(self.url("/notifications"))
          .query(&[("unread_only", unread_only.to_string())]),
        "GET /notifications",
      )
      .await
  }
}

impl NotificationFeed for ApiClient {
  type Error = Error;

  async fn fetch(&self) -> Result<Vec<Notification>> {
    Ok(self.notifications(false).await?.notifications)
  }

  async fn mark_read(&self, id: Uuid) -> Result<()> {
    self
      .send(
        self.client.post(self.url(&format!("/notifications/{id}/read"))),
        "POST /notifications/{id}/read",
      )
      .await?;
    Ok(())
  }

  async fn mark_all_read(&self) -> Result<usize> {
    let outcome: MarkAllRead = self
      .get_json(
        self.client.post(self.url("/notifications/read-all")),
        "POST /notifications/read-all",
      )
      .await?;
    Ok(outcome.updated)
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    self
      .send(
        self.client.delete(self.url(&format!("/notifications/{id}"))),
        "DELETE /notifications/{id}",
      )
      .await?;
    Ok(())
  }
}
