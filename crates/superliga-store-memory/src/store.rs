//! [`MemoryStore`] — the in-memory implementation of [`TableStore`].

use std::{
  collections::BTreeMap,
  convert::Infallible,
  sync::{Arc, Mutex},
};

use superliga_core::{
  record::{Event, Keyed, Match, Player, Team},
  store::TableStore,
};

#[derive(Default)]
struct Collections {
  teams:   BTreeMap<String, Team>,
  players: BTreeMap<String, Player>,
  matches: BTreeMap<String, Match>,
  events:  BTreeMap<String, Event>,
}

/// A table store held entirely in memory.
///
/// Cloning is cheap — clones share the same collections. Iteration order is
/// keyed (BTreeMap), which keeps test output deterministic even though the
/// store contract leaves ordering unspecified.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn with<R>(&self, f: impl FnOnce(&mut Collections) -> R) -> R {
    // Lock poisoning can only happen if a panic escaped another accessor,
    // and every accessor is panic-free.
    let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut guard)
  }
}

/// Replace-by-key insertion: the second write for an id wins wholesale.
fn upsert_into<T: Keyed + Clone>(map: &mut BTreeMap<String, T>, records: &[T]) {
  for record in records {
    map.insert(record.key().to_owned(), record.clone());
  }
}

impl TableStore for MemoryStore {
  type Error = Infallible;

  async fn upsert_teams(&self, teams: &[Team]) -> Result<(), Infallible> {
    self.with(|c| upsert_into(&mut c.teams, teams));
    Ok(())
  }

  async fn upsert_players(&self, players: &[Player]) -> Result<(), Infallible> {
    self.with(|c| upsert_into(&mut c.players, players));
    Ok(())
  }

  async fn upsert_matches(&self, matches: &[Match]) -> Result<(), Infallible> {
    self.with(|c| upsert_into(&mut c.matches, matches));
    Ok(())
  }

  async fn upsert_events(&self, events: &[Event]) -> Result<(), Infallible> {
    self.with(|c| upsert_into(&mut c.events, events));
    Ok(())
  }

  async fn matches_by_season(&self, season: &str) -> Result<Vec<Match>, Infallible> {
    Ok(self.with(|c| {
      c.matches
        .values()
        .filter(|m| m.season == season)
        .cloned()
        .collect()
    }))
  }

  async fn matches_by_team(&self, team_id: &str) -> Result<Vec<Match>, Infallible> {
    // A single pass over the collection: a match where the team plays
    // itself still yields exactly one row.
    Ok(self.with(|c| {
      c.matches
        .values()
        .filter(|m| m.home_team_id == team_id || m.away_team_id == team_id)
        .cloned()
        .collect()
    }))
  }

  async fn events_by_player(&self, player_id: &str) -> Result<Vec<Event>, Infallible> {
    Ok(self.with(|c| {
      c.events
        .values()
        .filter(|e| e.player_id.as_deref() == Some(player_id))
        .cloned()
        .collect()
    }))
  }

  async fn events_by_match(&self, match_id: &str) -> Result<Vec<Event>, Infallible> {
    Ok(self.with(|c| {
      c.events
        .values()
        .filter(|e| e.match_id == match_id)
        .cloned()
        .collect()
    }))
  }

  async fn all_teams(&self) -> Result<Vec<Team>, Infallible> {
    Ok(self.with(|c| c.teams.values().cloned().collect()))
  }

  async fn all_players(&self) -> Result<Vec<Player>, Infallible> {
    Ok(self.with(|c| c.players.values().cloned().collect()))
  }

  async fn all_matches(&self) -> Result<Vec<Match>, Infallible> {
    Ok(self.with(|c| c.matches.values().cloned().collect()))
  }

  async fn all_events(&self) -> Result<Vec<Event>, Infallible> {
    Ok(self.with(|c| c.events.values().cloned().collect()))
  }
}
