//! Hosted-store backend for the superliga table store.
//!
//! Talks to a Supabase-style PostgREST API over HTTPS: upserts are `POST`s
//! with merge-duplicates resolution, reads are `GET`s with equality
//! filters. One [`RestStore`] instance wraps one authenticated client and
//! is constructed explicitly at startup, then injected into whatever needs
//! it.

mod filter;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{RestConfig, RestStore};
