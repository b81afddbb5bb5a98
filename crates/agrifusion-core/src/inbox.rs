//! The notification read-state manager.
//!
//! An [`Inbox`] owns the list of notifications loaded for one recipient and a
//! [`NotificationFeed`] that talks to wherever those notifications live. Every
//! mutation is forwarded to the feed and followed by a refresh, so the loaded
//! list always reflects what the feed last reported. The unread count is
//! derived from the loaded list and never stored.

use std::future::Future;

use uuid::Uuid;

use crate::notification::{self, Notification};

/// Fetches and mutates the notifications of a single, implicit recipient.
///
/// Implemented by the HTTP client; a feed over a local backend only needs to
/// close over the recipient id.
pub trait NotificationFeed: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All notifications for the recipient, newest first.
  fn fetch(
    &self,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  fn mark_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Returns the number of notifications that changed state.
  fn mark_all_read(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// In-memory view of one recipient's notifications.
///
/// Failures are returned to the caller; the loaded list is left as it was
/// when a mutation or refresh fails.
pub struct Inbox<F> {
  feed:  F,
  items: Vec<Notification>,
}

impl<F: NotificationFeed> Inbox<F> {
  /// An empty inbox. Call [`Inbox::refresh`] to load it.
  pub fn new(feed: F) -> Self { Self { feed, items: Vec::new() } }

  /// Build an inbox and load it.
  pub async fn load(feed: F) -> Result<Self, F::Error> {
    let mut inbox = Self::new(feed);
    inbox.refresh().await?;
    Ok(inbox)
  }

  pub fn notifications(&self) -> &[Notification] { &self.items }

  pub fn unread_count(&self) -> usize { notification::unread_count(&self.items) }

  pub fn feed(&self) -> &F { &self.feed }

  pub async fn refresh(&mut self) -> Result<(), F::Error> {
    self.items = self.feed.fetch().await?;
    Ok(())
  }

  pub async fn mark_as_read(&mut self, id: Uuid) -> Result<(), F::Error> {
    self.feed.mark_read(id).await?;
    self.refresh().await
  }

  /// Returns how many notifications the feed reported as changed.
  pub async fn mark_all_as_read(&mut self) -> Result<usize, F::Error> {
    let updated = self.feed.mark_all_read().await?;
    self.refresh().await?;
    Ok(updated)
  }

  pub async fn delete(&mut self, id: Uuid) -> Result<(), F::Error> {
    self.feed.delete(id).await?;
    self.refresh().await
  }
}
