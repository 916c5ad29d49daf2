//! The four persisted entities: team, player, match, event.
//!
//! Every record is keyed by an opaque string id assigned by the upstream
//! data source; this system never mints its own ids. Records are "open"
//! mappings: the typed fields below are the contract, and anything else the
//! provider sends rides along in the flattened `extra` map so a backend can
//! over- or under-populate columns without breaking deserialisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity-key accessor shared by all four entities.
///
/// Store backends key their collections on this; referential fields
/// (`home_team_id`, `player_id`, ...) point at these keys but are never
/// validated at write time.
pub trait Keyed {
  fn key(&self) -> &str;
}

// ─── Team ────────────────────────────────────────────────────────────────────

/// A club competing in the configured season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
  pub id:   String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub short_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub crest_url:  Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Keyed for Team {
  fn key(&self) -> &str {
    &self.id
  }
}

// ─── Player ──────────────────────────────────────────────────────────────────

/// A player, weakly linked to a team by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
  pub id:   String,
  pub name: String,
  /// Weak reference to [`Team::id`]; may dangle until the team is ingested.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub team_id: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Keyed for Player {
  fn key(&self) -> &str {
    &self.id
  }
}

// ─── Match ───────────────────────────────────────────────────────────────────

/// One fixture in a season.
///
/// `season` is a required, non-empty string in the "2024-2025" shape;
/// queries filter on exact equality. The tuple (season, home_team_id,
/// away_team_id, match_date) is the semantic dedup key, but identity is
/// still the upstream `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
  pub id:           String,
  pub season:       String,
  pub match_date:   DateTime<Utc>,
  pub home_team_id: String,
  pub away_team_id: String,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Keyed for Match {
  fn key(&self) -> &str {
    &self.id
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// What happened during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
  Goal,
  OwnGoal,
  YellowCard,
  RedCard,
  Substitution,
  /// Provider event type we do not recognise; the original string is kept
  /// in the record's `extra` map by the ingestion mapper.
  #[serde(other)]
  Other,
}

/// A single in-match event (goal, card, substitution, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub id:       String,
  /// Weak reference to [`Match::id`].
  pub match_id: String,
  /// Weak reference to [`Player::id`]; absent for team-level events.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub player_id: Option<String>,
  pub kind: EventKind,
  /// Minute within the match, when the provider supplies one.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub minute: Option<u32>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Keyed for Event {
  fn key(&self) -> &str {
    &self.id
  }
}
