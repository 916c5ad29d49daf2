//! [`RestStore`] — the PostgREST implementation of [`TableStore`].

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use superliga_core::{
  record::{Event, Match, Player, Team},
  store::{Table, TableStore},
};

use crate::{
  Error, Result,
  filter::{either_side, eq},
};

/// Connection settings for the hosted store. Both fields come from opaque
/// configuration; neither is ever hard-coded.
#[derive(Debug, Clone)]
pub struct RestConfig {
  /// Project base URL, e.g. `https://xyzcompany.supabase.co`.
  pub base_url: String,
  /// Service or anon API key; sent as both `apikey` and bearer token.
  pub api_key:  String,
}

/// A table store backed by a hosted PostgREST endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. All
/// operations are network calls; nothing is cached here (read-side caching
/// belongs to consumers).
#[derive(Clone)]
pub struct RestStore {
  client: reqwest::Client,
  config: RestConfig,
}

impl RestStore {
  /// Build a store from `config`.
  ///
  /// Fails with [`Error::Config`] if either credential is empty — running
  /// with undefined connectivity is never an option.
  pub fn new(config: RestConfig) -> Result<Self> {
    if config.base_url.trim().is_empty() {
      return Err(Error::Config("base_url"));
    }
    if config.api_key.trim().is_empty() {
      return Err(Error::Config("api_key"));
    }

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(Error::Transport)?;

    Ok(Self { client, config })
  }

  /// `{base_url}/rest/v1/{table}`
  pub(crate) fn table_url(&self, table: Table) -> String {
    format!(
      "{}/rest/v1/{}",
      self.config.base_url.trim_end_matches('/'),
      table
    )
  }

  fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req
      .header("apikey", &self.config.api_key)
      .bearer_auth(&self.config.api_key)
  }

  /// Batch upsert keyed on each record's primary key. `merge-duplicates`
  /// makes an existing id have its fields replaced rather than producing a
  /// duplicate row. Best-effort at the batch level: the store applies what
  /// it can and rejects the rest wholesale, so callers recover by
  /// re-running, not by retrying here.
  async fn upsert<T: Serialize>(&self, table: Table, records: &[T]) -> Result<()> {
    if records.is_empty() {
      return Ok(());
    }

    let response = self
      .authed(self.client.post(self.table_url(table)))
      .header("Prefer", "resolution=merge-duplicates,return=minimal")
      .json(records)
      .send()
      .await
      .map_err(|e| {
        tracing::error!(%table, error = %e, "store unreachable during upsert");
        Error::Transport(e)
      })?;

    let status = response.status();
    if !status.is_success() {
      tracing::error!(%table, %status, "store rejected upsert");
      return Err(Error::Rejected { table, status });
    }

    tracing::debug!(%table, count = records.len(), "upserted batch");
    Ok(())
  }

  /// `GET {table}?select=*[&filter]`, deserialised into records. A store
  /// with no matching rows answers `[]`, which surfaces as `Ok(vec![])` —
  /// empty is a normal state, not an error.
  async fn select<T: DeserializeOwned>(
    &self,
    table: Table,
    filter: Option<(String, String)>,
  ) -> Result<Vec<T>> {
    let mut query = vec![("select".to_owned(), "*".to_owned())];
    query.extend(filter);

    let response = self
      .authed(self.client.get(self.table_url(table)))
      .query(&query)
      .send()
      .await
      .map_err(|e| {
        tracing::error!(%table, error = %e, "store unreachable during read");
        Error::Transport(e)
      })?;

    let status = response.status();
    if !status.is_success() {
      tracing::error!(%table, %status, "store rejected read");
      return Err(Error::Rejected { table, status });
    }

    response
      .json()
      .await
      .map_err(|source| Error::Decode { table, source })
  }
}

impl TableStore for RestStore {
  type Error = Error;

  async fn upsert_teams(&self, teams: &[Team]) -> Result<()> {
    self.upsert(Table::Teams, teams).await
  }

  async fn upsert_players(&self, players: &[Player]) -> Result<()> {
    self.upsert(Table::Players, players).await
  }

  async fn upsert_matches(&self, matches: &[Match]) -> Result<()> {
    self.upsert(Table::Matches, matches).await
  }

  async fn upsert_events(&self, events: &[Event]) -> Result<()> {
    self.upsert(Table::Events, events).await
  }

  async fn matches_by_season(&self, season: &str) -> Result<Vec<Match>> {
    self
      .select(Table::Matches, Some(eq("season", season)))
      .await
  }

  async fn matches_by_team(&self, team_id: &str) -> Result<Vec<Match>> {
    self
      .select(Table::Matches, Some(either_side(team_id)))
      .await
  }

  async fn events_by_player(&self, player_id: &str) -> Result<Vec<Event>> {
    self
      .select(Table::Events, Some(eq("player_id", player_id)))
      .await
  }

  async fn events_by_match(&self, match_id: &str) -> Result<Vec<Event>> {
    self
      .select(Table::Events, Some(eq("match_id", match_id)))
      .await
  }

  async fn all_teams(&self) -> Result<Vec<Team>> {
    self.select(Table::Teams, None).await
  }

  async fn all_players(&self) -> Result<Vec<Player>> {
    self.select(Table::Players, None).await
  }

  async fn all_matches(&self) -> Result<Vec<Match>> {
    self.select(Table::Matches, None).await
  }

  async fn all_events(&self) -> Result<Vec<Event>> {
    self.select(Table::Events, None).await
  }
}
