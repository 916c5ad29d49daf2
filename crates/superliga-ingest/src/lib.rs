//! The superliga ingestion collector.
//!
//! One linear batch pass: fetch the season's match list from the upstream
//! provider, audit the raw payloads to timestamped local artifacts, map
//! them into domain records (quarantining anything malformed), and upsert
//! into the table store. A failure for one team or match is logged and
//! skipped; the pass always runs to completion and exits. Recovery is
//! re-running the pass — upserts make that idempotent at the entity level.

pub mod audit;
pub mod collector;
pub mod fotmob;
pub mod map;

pub mod error;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
