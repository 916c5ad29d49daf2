//! In-process backend for the superliga table store.
//!
//! Holds all four collections in memory behind a mutex. This is the
//! executable reference for the store contract (upsert-by-id, exact-match
//! filters, empty reads) and the store double used by collector tests; it
//! persists nothing.

mod store;

pub use store::MemoryStore;
