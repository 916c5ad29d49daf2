//! End-to-end collector tests against a scripted source provider and the
//! in-memory store backend.

use std::collections::{HashMap, HashSet};

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use superliga_core::{
  record::{Event, EventKind, Match, Player, Team},
  source::SourceProvider,
  store::{Table, TableStore},
};
use superliga_store_memory::MemoryStore;

use crate::{
  audit::{AuditWriter, artifacts_for_stamp},
  collector::{Collector, Stage},
};

// ─── Scripted source ─────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("scripted source failure: {0}")]
struct ScriptedError(String);

/// A provider that answers from fixed maps and fails on demand.
#[derive(Clone, Default)]
struct ScriptedSource {
  matches:       Vec<Value>,
  teams:         HashMap<String, Value>,
  events:        HashMap<String, Vec<Value>>,
  players:       HashMap<String, Value>,
  failing_teams: HashSet<String>,
  fail_matches:  bool,
}

impl SourceProvider for ScriptedSource {
  type Error = ScriptedError;

  async fn league_matches(&self) -> Result<Vec<Value>, ScriptedError> {
    if self.fail_matches {
      return Err(ScriptedError("timeout fetching match list".to_owned()));
    }
    Ok(self.matches.clone())
  }

  async fn team_details(&self, team_id: &str) -> Result<Value, ScriptedError> {
    if self.failing_teams.contains(team_id) {
      return Err(ScriptedError(format!("connection reset fetching {team_id}")));
    }
    self
      .teams
      .get(team_id)
      .cloned()
      .ok_or_else(|| ScriptedError(format!("unknown team {team_id}")))
  }

  async fn player_details(&self, player_id: &str) -> Result<Value, ScriptedError> {
    self
      .players
      .get(player_id)
      .cloned()
      .ok_or_else(|| ScriptedError(format!("unknown player {player_id}")))
  }

  async fn match_events(&self, match_id: &str) -> Result<Vec<Value>, ScriptedError> {
    Ok(self.events.get(match_id).cloned().unwrap_or_default())
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn raw_match(id: &str, home: &str, away: &str) -> Value {
  json!({
    "id": id,
    "season": "2024-2025",
    "match_date": "2024-08-01T18:00:00Z",
    "home_team_id": home,
    "away_team_id": away,
  })
}

fn raw_team(id: &str, name: &str) -> Value {
  json!({ "id": id, "name": name })
}

fn audit_in(dir: &tempfile::TempDir) -> AuditWriter {
  AuditWriter::create(
    dir.path(),
    Utc.with_ymd_and_hms(2024, 8, 1, 18, 1, 2).unwrap(),
  )
  .unwrap()
}

// ─── Resilience ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_team_is_skipped_and_the_pass_completes() {
  let source = ScriptedSource {
    matches: vec![raw_match("m1", "t1", "t2"), raw_match("m2", "t1", "T7")],
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
      ("T7".to_owned(), raw_team("T7", "unreachable")),
    ]),
    failing_teams: HashSet::from(["T7".to_owned()]),
    ..Default::default()
  };
  let store = MemoryStore::new();
  let dir = tempfile::tempdir().unwrap();

  let collector =
    Collector::new(source, store.clone(), "2024-2025", audit_in(&dir));
  let report = collector.run().await.unwrap();

  assert_eq!(report.matches_upserted, 2);
  assert_eq!(report.teams_upserted, 2);

  let mut team_ids: Vec<_> = store
    .all_teams()
    .await
    .unwrap()
    .into_iter()
    .map(|t| t.id)
    .collect();
  team_ids.sort();
  assert_eq!(team_ids, vec!["t1", "t2"]);

  // Exactly one skipped-item record, naming T7 and the stage it died in.
  assert_eq!(report.skipped.len(), 1);
  assert_eq!(report.skipped[0].id, "T7");
  assert_eq!(report.skipped[0].stage, Stage::TeamDetails);
  assert!(report.skipped[0].reason.contains("connection reset"));
}

#[tokio::test]
async fn malformed_match_is_quarantined_not_stored() {
  let source = ScriptedSource {
    matches: vec![
      raw_match("m1", "t1", "t2"),
      json!({ "id": "m-broken", "home_team_id": "t1" }),
    ],
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
    ]),
    ..Default::default()
  };
  let store = MemoryStore::new();
  let dir = tempfile::tempdir().unwrap();

  let collector =
    Collector::new(source, store.clone(), "2024-2025", audit_in(&dir));
  let report = collector.run().await.unwrap();

  assert_eq!(report.quarantined, 1);
  assert_eq!(report.matches_upserted, 1);
  let stored = store.all_matches().await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].id, "m1");
}

// ─── Full pass ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_pass_ingests_matches_teams_events_and_players() {
  let source = ScriptedSource {
    matches: vec![raw_match("m1", "t1", "t2")],
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
    ]),
    events: HashMap::from([(
      "m1".to_owned(),
      vec![
        json!({ "id": "e1", "player_id": "p1", "kind": "goal", "minute": 27 }),
        json!({ "id": "e2", "kind": "substitution", "minute": 60 }),
      ],
    )]),
    players: HashMap::from([(
      "p1".to_owned(),
      json!({ "id": "p1", "name": "Viktor Claesson", "team_id": "t1" }),
    )]),
    ..Default::default()
  };
  let store = MemoryStore::new();
  let dir = tempfile::tempdir().unwrap();

  let collector =
    Collector::new(source, store.clone(), "2024-2025", audit_in(&dir));
  let report = collector.run().await.unwrap();

  assert_eq!(report.matches_upserted, 1);
  assert_eq!(report.teams_upserted, 2);
  assert_eq!(report.events_upserted, 2);
  assert_eq!(report.players_upserted, 1);
  assert_eq!(report.quarantined, 0);
  assert!(report.skipped.is_empty());

  let events = store.events_by_match("m1").await.unwrap();
  assert_eq!(events.len(), 2);
  assert_eq!(events[0].kind, EventKind::Goal);

  let p1_events = store.events_by_player("p1").await.unwrap();
  assert_eq!(p1_events.len(), 1);
  assert_eq!(p1_events[0].id, "e1");

  let players = store.all_players().await.unwrap();
  assert_eq!(players.len(), 1);
  assert_eq!(players[0].name, "Viktor Claesson");
}

#[tokio::test]
async fn rerunning_the_pass_is_idempotent() {
  let source = ScriptedSource {
    matches: vec![raw_match("m1", "t1", "t2")],
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
    ]),
    ..Default::default()
  };
  let store = MemoryStore::new();
  let dir1 = tempfile::tempdir().unwrap();
  let dir2 = tempfile::tempdir().unwrap();

  Collector::new(source.clone(), store.clone(), "2024-2025", audit_in(&dir1))
    .run()
    .await
    .unwrap();
  Collector::new(source, store.clone(), "2024-2025", audit_in(&dir2))
    .run()
    .await
    .unwrap();

  assert_eq!(store.all_matches().await.unwrap().len(), 1);
  assert_eq!(store.all_teams().await.unwrap().len(), 2);
}

// ─── Audit artifacts ─────────────────────────────────────────────────────────

#[tokio::test]
async fn a_pass_writes_all_five_artifacts() {
  let raws = vec![raw_match("m1", "t1", "t2")];
  let source = ScriptedSource {
    matches: raws.clone(),
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
    ]),
    ..Default::default()
  };
  let store = MemoryStore::new();
  let dir = tempfile::tempdir().unwrap();
  let audit = audit_in(&dir);
  let stamp = audit.stamp().to_owned();

  Collector::new(source, store, "2024-2025", audit)
    .run()
    .await
    .unwrap();

  let names: Vec<String> = artifacts_for_stamp(dir.path(), &stamp)
    .unwrap()
    .into_iter()
    .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
    .collect();
  assert_eq!(
    names,
    vec![
      format!("match_events_{stamp}.json"),
      format!("matches_{stamp}.csv"),
      format!("matches_raw_{stamp}.json"),
      format!("teams_{stamp}.csv"),
      format!("teams_{stamp}.json"),
    ]
  );

  // The raw dump is verbatim, untouched by mapping.
  let raw_dump: Value = serde_json::from_slice(
    &std::fs::read(dir.path().join(format!("matches_raw_{stamp}.json"))).unwrap(),
  )
  .unwrap();
  assert_eq!(raw_dump, Value::Array(raws));
}

// ─── Store failures ──────────────────────────────────────────────────────────

/// Delegates to a `MemoryStore` but rejects every write to one collection,
/// imitating a hosted store that rejects that collection's schema.
#[derive(Clone)]
struct RejectingStore {
  inner:  MemoryStore,
  reject: Table,
}

impl RejectingStore {
  fn rejection(&self, table: Table) -> Result<(), ScriptedError> {
    if self.reject == table {
      return Err(ScriptedError(format!("schema mismatch on {table}")));
    }
    Ok(())
  }
}

impl TableStore for RejectingStore {
  type Error = ScriptedError;

  async fn upsert_teams(&self, teams: &[Team]) -> Result<(), ScriptedError> {
    self.rejection(Table::Teams)?;
    self.inner.upsert_teams(teams).await.map_err(|e| match e {})
  }

  async fn upsert_players(&self, players: &[Player]) -> Result<(), ScriptedError> {
    self.rejection(Table::Players)?;
    self.inner.upsert_players(players).await.map_err(|e| match e {})
  }

  async fn upsert_matches(&self, matches: &[Match]) -> Result<(), ScriptedError> {
    self.rejection(Table::Matches)?;
    self.inner.upsert_matches(matches).await.map_err(|e| match e {})
  }

  async fn upsert_events(&self, events: &[Event]) -> Result<(), ScriptedError> {
    self.rejection(Table::Events)?;
    self.inner.upsert_events(events).await.map_err(|e| match e {})
  }

  async fn matches_by_season(&self, season: &str) -> Result<Vec<Match>, ScriptedError> {
    self.inner.matches_by_season(season).await.map_err(|e| match e {})
  }

  async fn matches_by_team(&self, team_id: &str) -> Result<Vec<Match>, ScriptedError> {
    self.inner.matches_by_team(team_id).await.map_err(|e| match e {})
  }

  async fn events_by_player(&self, player_id: &str) -> Result<Vec<Event>, ScriptedError> {
    self.inner.events_by_player(player_id).await.map_err(|e| match e {})
  }

  async fn events_by_match(&self, match_id: &str) -> Result<Vec<Event>, ScriptedError> {
    self.inner.events_by_match(match_id).await.map_err(|e| match e {})
  }

  async fn all_teams(&self) -> Result<Vec<Team>, ScriptedError> {
    self.inner.all_teams().await.map_err(|e| match e {})
  }

  async fn all_players(&self) -> Result<Vec<Player>, ScriptedError> {
    self.inner.all_players().await.map_err(|e| match e {})
  }

  async fn all_matches(&self) -> Result<Vec<Match>, ScriptedError> {
    self.inner.all_matches().await.map_err(|e| match e {})
  }

  async fn all_events(&self) -> Result<Vec<Event>, ScriptedError> {
    self.inner.all_events().await.map_err(|e| match e {})
  }
}

#[tokio::test]
async fn rejected_event_batch_is_reported_and_the_pass_continues() {
  let source = ScriptedSource {
    matches: vec![raw_match("m1", "t1", "t2")],
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
    ]),
    events: HashMap::from([(
      "m1".to_owned(),
      vec![json!({ "id": "e1", "kind": "goal" })],
    )]),
    ..Default::default()
  };
  let store = RejectingStore {
    inner:  MemoryStore::new(),
    reject: Table::Events,
  };
  let dir = tempfile::tempdir().unwrap();

  let collector =
    Collector::new(source, store.clone(), "2024-2025", audit_in(&dir));
  let report = collector.run().await.unwrap();

  // Matches and teams made it; the event batch is on the skip list.
  assert_eq!(report.matches_upserted, 1);
  assert_eq!(report.teams_upserted, 2);
  assert_eq!(report.events_upserted, 0);
  assert_eq!(report.skipped.len(), 1);
  assert_eq!(report.skipped[0].stage, Stage::Upsert(Table::Events));
  assert_eq!(report.skipped[0].id, "m1");
  assert_eq!(store.inner.all_matches().await.unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_match_batch_names_every_match_id() {
  let source = ScriptedSource {
    matches: vec![raw_match("m1", "t1", "t2"), raw_match("m2", "t2", "t1")],
    teams: HashMap::from([
      ("t1".to_owned(), raw_team("t1", "FC København")),
      ("t2".to_owned(), raw_team("t2", "Brøndby IF")),
    ]),
    ..Default::default()
  };
  let store = RejectingStore {
    inner:  MemoryStore::new(),
    reject: Table::Matches,
  };
  let dir = tempfile::tempdir().unwrap();

  let report = Collector::new(source, store.clone(), "2024-2025", audit_in(&dir))
    .run()
    .await
    .unwrap();

  assert_eq!(report.matches_upserted, 0);
  assert_eq!(report.skipped.len(), 1);
  assert_eq!(report.skipped[0].stage, Stage::Upsert(Table::Matches));
  assert_eq!(report.skipped[0].id, "m1,m2");
  // Teams are derived from the mapped list, not the store, so they still
  // make it through.
  assert_eq!(report.teams_upserted, 2);
}

#[tokio::test]
async fn failed_match_list_fetch_still_completes_and_audits() {
  let source = ScriptedSource {
    fail_matches: true,
    ..Default::default()
  };
  let store = MemoryStore::new();
  let dir = tempfile::tempdir().unwrap();
  let audit = audit_in(&dir);
  let stamp = audit.stamp().to_owned();

  // The pass succeeds; the dead list fetch is a skipped item, not an abort.
  let report = Collector::new(source, store.clone(), "2024-2025", audit)
    .run()
    .await
    .unwrap();

  assert_eq!(report.matches_upserted, 0);
  assert_eq!(report.teams_upserted, 0);
  assert_eq!(report.events_upserted, 0);
  assert_eq!(report.skipped.len(), 1);
  assert_eq!(report.skipped[0].stage, Stage::MatchList);
  assert_eq!(report.skipped[0].id, "2024-2025");
  assert!(report.skipped[0].reason.contains("timeout"));

  assert!(store.all_matches().await.unwrap().is_empty());

  // All five artifacts exist, with an empty raw dump.
  let names: Vec<String> = artifacts_for_stamp(dir.path(), &stamp)
    .unwrap()
    .into_iter()
    .map(|p| p.file_name().unwrap().to_str().unwrap().to_owned())
    .collect();
  assert_eq!(names.len(), 5);
  let raw_dump: Value = serde_json::from_slice(
    &std::fs::read(dir.path().join(format!("matches_raw_{stamp}.json"))).unwrap(),
  )
  .unwrap();
  assert_eq!(raw_dump, json!([]));
}
