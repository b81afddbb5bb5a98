//! Core types and trait definitions for AgriFusion.
//!
//! No HTTP or database dependencies. The storage backend, the JSON API and
//! the command-line client all build on these types.

// Trait impls use native `async fn`; the trait signatures carry the `Send`
// bounds.
#![allow(async_fn_in_trait)]

pub mod backend;
pub mod error;
pub mod farmer;
pub mod filters;
pub mod inbox;
pub mod notification;
pub mod profile;

pub use error::{Error, Result};
