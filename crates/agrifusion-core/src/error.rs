//! Error types for `agrifusion-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("unknown profile status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown notification type: {0:?}")]
  UnknownNotificationType(String),

  #[error("unknown notification priority: {0:?}")]
  UnknownPriority(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
