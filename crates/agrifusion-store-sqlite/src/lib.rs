//! SQLite backend for AgriFusion.
//!
//! Stands in for the hosted platform: profiles, farmers, notifications and
//! bearer sessions live in one SQLite file. Wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod encode;
mod schema;
mod session;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use session::{generate_token, hash_token};
pub use store::SqliteStore;
