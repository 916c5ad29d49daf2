//! The `TableStore` trait and the `Table` collection names.
//!
//! The trait is implemented by storage backends (`superliga-store-rest`
//! against the hosted store, `superliga-store-memory` for tests). The
//! ingestion collector and any read-side consumer depend on this
//! abstraction, not on a concrete backend.

use std::{fmt, future::Future};

use crate::record::{Event, Match, Player, Team};

// ─── Collections ─────────────────────────────────────────────────────────────

/// The four logical collections of the durable store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
  Teams,
  Players,
  Matches,
  Events,
}

impl Table {
  /// The table name as addressed in the backing store.
  pub fn as_str(self) -> &'static str {
    match self {
      Table::Teams => "teams",
      Table::Players => "players",
      Table::Matches => "matches",
      Table::Events => "events",
    }
  }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable table store.
///
/// Writes are upserts keyed on each record's id: an id already present has
/// all its provided fields replaced, never duplicated. Batches are
/// collection-level best-effort, not transactional — callers recover from a
/// failed batch by re-running the whole ingestion pass, which is idempotent
/// at the entity level.
///
/// Reads return `Ok` with an empty `Vec` when no rows match; an empty store
/// is a normal, displayable state, not an error. Errors are reserved for
/// the store being unreachable or rejecting an operation.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime, but a single store instance is treated as
/// single-owner: no method takes `&mut self`, and no ordering is guaranteed
/// across concurrent calls.
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  fn upsert_teams<'a>(
    &'a self,
    teams: &'a [Team],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn upsert_players<'a>(
    &'a self,
    players: &'a [Player],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn upsert_matches<'a>(
    &'a self,
    matches: &'a [Match],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn upsert_events<'a>(
    &'a self,
    events: &'a [Event],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Filtered reads ────────────────────────────────────────────────────

  /// All matches whose season equals `season` exactly (no prefix or
  /// substring matching). Order is unspecified; callers sort.
  fn matches_by_season<'a>(
    &'a self,
    season: &'a str,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + 'a;

  /// All matches where `team_id` appears as home or away side. One row per
  /// match id even in the degenerate case of a team drawn against itself.
  fn matches_by_team<'a>(
    &'a self,
    team_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + 'a;

  /// All events credited to `player_id`.
  fn events_by_player<'a>(
    &'a self,
    player_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + 'a;

  /// All events recorded within `match_id`.
  fn events_by_match<'a>(
    &'a self,
    match_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + 'a;

  // ── Full-collection reads ─────────────────────────────────────────────

  fn all_teams(
    &self,
  ) -> impl Future<Output = Result<Vec<Team>, Self::Error>> + Send + '_;

  fn all_players(
    &self,
  ) -> impl Future<Output = Result<Vec<Player>, Self::Error>> + Send + '_;

  fn all_matches(
    &self,
  ) -> impl Future<Output = Result<Vec<Match>, Self::Error>> + Send + '_;

  fn all_events(
    &self,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;
}
