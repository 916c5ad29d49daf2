//! Core types and trait definitions for the superliga data pipeline.
//!
//! This crate is deliberately free of HTTP dependencies. The scraper and the
//! store backends depend on it; it depends on nothing proprietary.

pub mod record;
pub mod source;
pub mod store;

pub use record::{Event, EventKind, Keyed, Match, Player, Team};
pub use source::SourceProvider;
pub use store::{Table, TableStore};
