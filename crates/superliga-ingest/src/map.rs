//! Raw provider payloads → domain records.
//!
//! The upstream schema is reverse-engineered and unstable, so nothing raw
//! crosses this boundary unchecked: required fields are validated, known
//! shape variants are normalised, and a record that fails validation is
//! quarantined (returned with its reason) rather than passed to storage.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use superliga_core::record::{Event, EventKind, Match, Player, Team};
use thiserror::Error;

// ─── Errors & outcomes ───────────────────────────────────────────────────────

/// Why a raw record was rejected at the mapping boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
  #[error("record is not a JSON object")]
  NotAnObject,

  #[error("missing required field `{0}`")]
  MissingField(&'static str),

  /// Matches must carry a non-empty season string ("2024-2025" shape).
  #[error("season is empty")]
  EmptySeason,

  #[error("unparseable timestamp `{0}`")]
  BadTimestamp(String),
}

/// A raw record that failed validation, kept for the run report.
#[derive(Debug, Clone)]
pub struct Rejected {
  pub raw:    Value,
  pub reason: MapError,
}

/// The result of mapping a raw list: the good records plus the quarantine.
#[derive(Debug)]
pub struct MapOutcome<T> {
  pub records:  Vec<T>,
  pub rejected: Vec<Rejected>,
}

impl<T> Default for MapOutcome<T> {
  fn default() -> Self {
    Self { records: Vec::new(), rejected: Vec::new() }
  }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

/// Ids arrive as strings or bare numbers depending on the endpoint; both
/// become opaque strings here.
fn stringish(value: &Value) -> Option<String> {
  match value {
    Value::String(s) if !s.is_empty() => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn optional(object: &Map<String, Value>, key: &str) -> Option<String> {
  object.get(key).and_then(stringish)
}

fn required(
  object: &Map<String, Value>,
  key: &'static str,
) -> Result<String, MapError> {
  optional(object, key).ok_or(MapError::MissingField(key))
}

/// Everything not consumed by the typed fields rides along untouched.
fn leftover(object: &Map<String, Value>, consumed: &[&str]) -> Map<String, Value> {
  object
    .iter()
    .filter(|(key, _)| !consumed.contains(&key.as_str()))
    .map(|(key, value)| (key.clone(), value.clone()))
    .collect()
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>, MapError> {
  raw.as_object().ok_or(MapError::NotAnObject)
}

// ─── Match ───────────────────────────────────────────────────────────────────

/// A team id is either flat (`home_team_id`) or nested under the side
/// object (`home.id`); both provider shapes are accepted.
fn side_id(
  object: &Map<String, Value>,
  flat: &'static str,
  nested: &str,
) -> Result<String, MapError> {
  if let Some(id) = optional(object, flat) {
    return Ok(id);
  }
  object
    .get(nested)
    .and_then(Value::as_object)
    .and_then(|side| optional(side, "id"))
    .ok_or(MapError::MissingField(flat))
}

fn timestamp(object: &Map<String, Value>) -> Result<DateTime<Utc>, MapError> {
  let raw = optional(object, "match_date")
    .or_else(|| optional(object, "utcTime"))
    .ok_or(MapError::MissingField("match_date"))?;
  DateTime::parse_from_rfc3339(&raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|_| MapError::BadTimestamp(raw))
}

/// Validate one raw match. `default_season` fills in the season when the
/// provider omits it (the pass is season-scoped anyway); an empty season is
/// rejected either way.
pub fn match_record(raw: &Value, default_season: &str) -> Result<Match, MapError> {
  let object = as_object(raw)?;

  let id = required(object, "id")?;
  let home_team_id = side_id(object, "home_team_id", "home")?;
  let away_team_id = side_id(object, "away_team_id", "away")?;
  let match_date = timestamp(object)?;

  let season = optional(object, "season")
    .unwrap_or_else(|| default_season.to_owned());
  if season.trim().is_empty() {
    return Err(MapError::EmptySeason);
  }

  Ok(Match {
    id,
    season,
    match_date,
    home_team_id,
    away_team_id,
    extra: leftover(
      object,
      &[
        "id",
        "season",
        "match_date",
        "utcTime",
        "home_team_id",
        "away_team_id",
        "home",
        "away",
      ],
    ),
  })
}

pub fn match_records(raw: &[Value], default_season: &str) -> MapOutcome<Match> {
  let mut outcome = MapOutcome::default();
  for value in raw {
    match match_record(value, default_season) {
      Ok(record) => outcome.records.push(record),
      Err(reason) => outcome.rejected.push(Rejected {
        raw: value.clone(),
        reason,
      }),
    }
  }
  outcome
}

// ─── Team & player ───────────────────────────────────────────────────────────

pub fn team_record(raw: &Value) -> Result<Team, MapError> {
  let object = as_object(raw)?;
  Ok(Team {
    id:         required(object, "id")?,
    name:       required(object, "name")?,
    short_name: optional(object, "short_name").or_else(|| optional(object, "shortName")),
    crest_url:  optional(object, "crest_url")
      .or_else(|| optional(object, "crest"))
      .or_else(|| optional(object, "logo")),
    extra:      leftover(
      object,
      &["id", "name", "short_name", "shortName", "crest_url", "crest", "logo"],
    ),
  })
}

pub fn player_record(raw: &Value) -> Result<Player, MapError> {
  let object = as_object(raw)?;
  Ok(Player {
    id:      required(object, "id")?,
    name:    required(object, "name")?,
    team_id: optional(object, "team_id").or_else(|| optional(object, "teamId")),
    extra:   leftover(object, &["id", "name", "team_id", "teamId"]),
  })
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// Normalise a provider event-type string ("Yellow Card", "yellowCard",
/// "yellow_card") into [`EventKind`]; anything unrecognised is `Other`.
fn event_kind(raw: &str) -> EventKind {
  let mut normalised = String::with_capacity(raw.len() + 4);
  for (i, c) in raw.chars().enumerate() {
    if c.is_whitespace() || c == '-' {
      normalised.push('_');
    } else if c.is_uppercase() {
      if i > 0 && !normalised.ends_with('_') {
        normalised.push('_');
      }
      normalised.extend(c.to_lowercase());
    } else {
      normalised.push(c);
    }
  }
  serde_json::from_value(Value::String(normalised)).unwrap_or(EventKind::Other)
}

/// Validate one raw in-match event. `match_id` is injected from the
/// enclosing fetch; the provider does not repeat it per event.
pub fn event_record(raw: &Value, match_id: &str) -> Result<Event, MapError> {
  let object = as_object(raw)?;

  let kind_raw = optional(object, "kind").or_else(|| optional(object, "type"));
  let kind = kind_raw.as_deref().map_or(EventKind::Other, event_kind);

  let mut extra = leftover(
    object,
    &["id", "match_id", "player_id", "playerId", "kind", "type", "minute"],
  );
  if kind == EventKind::Other {
    // Keep the unrecognised type string so no information is lost.
    if let Some(raw_kind) = kind_raw {
      extra.insert("raw_kind".to_owned(), Value::String(raw_kind));
    }
  }

  Ok(Event {
    id: required(object, "id")?,
    match_id: match_id.to_owned(),
    player_id: optional(object, "player_id")
      .or_else(|| optional(object, "playerId")),
    kind,
    minute: object
      .get("minute")
      .and_then(Value::as_u64)
      .and_then(|m| u32::try_from(m).ok()),
    extra,
  })
}

pub fn event_records(raw: &[Value], match_id: &str) -> MapOutcome<Event> {
  let mut outcome = MapOutcome::default();
  for value in raw {
    match event_record(value, match_id) {
      Ok(record) => outcome.records.push(record),
      Err(reason) => outcome.rejected.push(Rejected {
        raw: value.clone(),
        reason,
      }),
    }
  }
  outcome
}

// ─── Tests ───────────────────────────────────────────────────────────────────
