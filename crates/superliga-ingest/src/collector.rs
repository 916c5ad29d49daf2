//! One full ingestion pass, start to finish.
//!
//! The collector owns one source provider and one table store, both
//! injected at construction, and drives them strictly sequentially. Every
//! provider or store failure — including the initial match-list fetch — is
//! logged, recorded on the [`IngestReport`], and skipped; only failing to
//! write an audit artifact aborts a pass.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use superliga_core::{
  record::{Event, Match, Team},
  source::SourceProvider,
  store::{Table, TableStore},
};

use crate::{
  Result,
  audit::AuditWriter,
  map::{self, MapOutcome},
};

// ─── Report ──────────────────────────────────────────────────────────────────

/// Where in the pass an item was given up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  /// Fetching the season's match list.
  MatchList,
  /// Fetching or validating one team's details.
  TeamDetails,
  /// Fetching one match's event list.
  MatchEvents,
  /// Fetching or validating one player's details.
  PlayerDetails,
  /// Writing a batch to the named store collection.
  Upsert(Table),
}

/// An item that was skipped rather than ingested. Re-running the pass is
/// the only recovery mechanism; there is no retry within a run.
#[derive(Debug, Clone)]
pub struct SkippedItem {
  pub stage:  Stage,
  pub id:     String,
  pub reason: String,
}

/// What one pass actually did, observable to callers and tests (not just
/// the log).
#[derive(Debug, Default)]
pub struct IngestReport {
  pub matches_upserted: usize,
  pub teams_upserted:   usize,
  pub players_upserted: usize,
  pub events_upserted:  usize,
  /// Raw list records rejected by the mapping boundary.
  pub quarantined: usize,
  pub skipped:     Vec<SkippedItem>,
}

// ─── Collector ───────────────────────────────────────────────────────────────

/// A single-shot batch collector; construct, [`run`](Self::run) once, drop.
pub struct Collector<S, T> {
  source: S,
  store:  T,
  season: String,
  audit:  AuditWriter,
}

impl<S: SourceProvider, T: TableStore> Collector<S, T> {
  pub fn new(
    source: S,
    store: T,
    season: impl Into<String>,
    audit: AuditWriter,
  ) -> Self {
    Self {
      source,
      store,
      season: season.into(),
      audit,
    }
  }

  /// Run the pass to completion and report what happened.
  pub async fn run(&self) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    // A failed list fetch leaves nothing to ingest this run, but the pass
    // still completes: the report and the audit artifacts are written, and
    // the next run recovers whatever this one missed.
    let raw_matches = match self.source.league_matches().await {
      Ok(raws) => raws,
      Err(e) => {
        skip_item(&mut report, Stage::MatchList, &self.season, &e);
        Vec::new()
      }
    };

    // The raw match list is audited verbatim before any transformation.
    self.audit.write_json("matches_raw", &raw_matches)?;
    tracing::info!(
      count = raw_matches.len(),
      season = %self.season,
      "fetched match list"
    );

    let matches = self.ingest_matches(&raw_matches, &mut report).await;
    let teams = self.ingest_teams(&matches, &mut report).await?;
    let events = self.ingest_events(&matches, &mut report).await?;
    self.ingest_players(&events, &mut report).await;

    self.audit.write_matches_csv(&matches)?;
    self.audit.write_teams_csv(&teams)?;

    Ok(report)
  }

  async fn ingest_matches(
    &self,
    raw_matches: &[Value],
    report: &mut IngestReport,
  ) -> Vec<Match> {
    let MapOutcome { records, rejected } =
      map::match_records(raw_matches, &self.season);
    for reject in &rejected {
      tracing::warn!(reason = %reject.reason, "quarantined raw match record");
    }
    report.quarantined += rejected.len();

    if !records.is_empty() {
      match self.store.upsert_matches(&records).await {
        Ok(()) => report.matches_upserted = records.len(),
        Err(e) => {
          // The whole batch was rejected; name every match id so the
          // report stays diagnosable.
          let batch = records
            .iter()
            .map(|m| m.id.as_str())
            .collect::<Vec<_>>()
            .join(",");
          skip_write(report, Table::Matches, &batch, &e);
        }
      }
    }
    records
  }

  /// Fetch and upsert details for every team referenced by the match list.
  /// The distinct id set comes from the home/away fields of the mapped
  /// matches; an ordered set keeps request order deterministic.
  async fn ingest_teams(
    &self,
    matches: &[Match],
    report: &mut IngestReport,
  ) -> Result<Vec<Team>> {
    let team_ids: BTreeSet<&str> = matches
      .iter()
      .flat_map(|m| [m.home_team_id.as_str(), m.away_team_id.as_str()])
      .collect();

    let mut raw_by_id = Map::new();
    let mut teams = Vec::new();

    for team_id in team_ids {
      let raw = match self.source.team_details(team_id).await {
        Ok(raw) => raw,
        Err(e) => {
          skip_item(report, Stage::TeamDetails, team_id, &e);
          continue;
        }
      };

      let team = match map::team_record(&raw) {
        Ok(team) => team,
        Err(reason) => {
          skip_item(report, Stage::TeamDetails, team_id, &reason);
          continue;
        }
      };

      raw_by_id.insert(team_id.to_owned(), raw);
      match self.store.upsert_teams(std::slice::from_ref(&team)).await {
        Ok(()) => {
          report.teams_upserted += 1;
          teams.push(team);
        }
        Err(e) => skip_write(report, Table::Teams, team_id, &e),
      }
    }

    self.audit.write_json("teams", &raw_by_id)?;
    Ok(teams)
  }

  /// Fetch and upsert the event list of every mapped match, one batch per
  /// match.
  async fn ingest_events(
    &self,
    matches: &[Match],
    report: &mut IngestReport,
  ) -> Result<Vec<Event>> {
    let mut raw_by_match = Map::new();
    let mut events = Vec::new();

    for m in matches {
      let raws = match self.source.match_events(&m.id).await {
        Ok(raws) => raws,
        Err(e) => {
          skip_item(report, Stage::MatchEvents, &m.id, &e);
          continue;
        }
      };
      raw_by_match.insert(m.id.clone(), Value::Array(raws.clone()));

      let MapOutcome { records, rejected } = map::event_records(&raws, &m.id);
      for reject in &rejected {
        tracing::warn!(
          match_id = %m.id,
          reason = %reject.reason,
          "quarantined raw event record"
        );
      }
      report.quarantined += rejected.len();

      if records.is_empty() {
        continue;
      }
      match self.store.upsert_events(&records).await {
        Ok(()) => {
          report.events_upserted += records.len();
          events.extend(records);
        }
        Err(e) => skip_write(report, Table::Events, &m.id, &e),
      }
    }

    self.audit.write_json("match_events", &raw_by_match)?;
    Ok(events)
  }

  /// Enrich the player table from the ids the ingested events reference.
  async fn ingest_players(&self, events: &[Event], report: &mut IngestReport) {
    let player_ids: BTreeSet<&str> = events
      .iter()
      .filter_map(|e| e.player_id.as_deref())
      .collect();

    for player_id in player_ids {
      let raw = match self.source.player_details(player_id).await {
        Ok(raw) => raw,
        Err(e) => {
          skip_item(report, Stage::PlayerDetails, player_id, &e);
          continue;
        }
      };

      let player = match map::player_record(&raw) {
        Ok(player) => player,
        Err(reason) => {
          skip_item(report, Stage::PlayerDetails, player_id, &reason);
          continue;
        }
      };

      match self
        .store
        .upsert_players(std::slice::from_ref(&player))
        .await
      {
        Ok(()) => report.players_upserted += 1,
        Err(e) => skip_write(report, Table::Players, player_id, &e),
      }
    }
  }
}

fn skip_item(
  report: &mut IngestReport,
  stage: Stage,
  id: &str,
  reason: &dyn std::fmt::Display,
) {
  tracing::warn!(?stage, entity = id, %reason, "skipping item; continuing");
  report.skipped.push(SkippedItem {
    stage,
    id: id.to_owned(),
    reason: reason.to_string(),
  });
}

fn skip_write(
  report: &mut IngestReport,
  table: Table,
  id: &str,
  error: &dyn std::fmt::Display,
) {
  tracing::error!(%table, entity = id, %error, "store write failed; continuing");
  report.skipped.push(SkippedItem {
    stage:  Stage::Upsert(table),
    id:     id.to_owned(),
    reason: error.to_string(),
  });
}
