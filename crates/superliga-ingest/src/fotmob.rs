//! FotMob implementation of [`SourceProvider`].
//!
//! The endpoint paths below are reverse-engineered and treated as unstable;
//! everything comes back as raw JSON and is validated later in
//! [`crate::map`]. List payloads arrive either as a bare array or wrapped
//! in an object (`{ "matches": [...] }`), so both shapes are accepted.

use std::time::Duration;

use serde_json::Value;
use superliga_core::source::SourceProvider;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.fotmob.com/api";

/// FotMob's league id for the Danish Superliga.
pub const DANISH_SUPERLIGA: &str = "73";

#[derive(Debug, Clone)]
pub struct FotmobConfig {
  pub base_url:  String,
  pub league_id: String,
}

impl Default for FotmobConfig {
  fn default() -> Self {
    Self {
      base_url:  DEFAULT_BASE_URL.to_owned(),
      league_id: DANISH_SUPERLIGA.to_owned(),
    }
  }
}

/// HTTP client for the FotMob JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Requests
/// are issued one at a time by the collector; there is no fan-out.
#[derive(Clone)]
pub struct FotmobClient {
  client: reqwest::Client,
  config: FotmobConfig,
}

impl FotmobClient {
  pub fn new(config: FotmobConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(Error::Http)?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
  }

  async fn fetch(&self, path: &str) -> Result<Value> {
    let response = self
      .client
      .get(self.url(path))
      .send()
      .await
      .map_err(Error::Http)?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::SourceStatus {
        path: path.to_owned(),
        status,
      });
    }

    response.json().await.map_err(Error::Http)
  }
}

/// Accept a bare array or an object wrapping the array under `key`.
fn list_from(value: Value, key: &str, path: &str) -> Result<Vec<Value>> {
  match value {
    Value::Array(items) => Ok(items),
    Value::Object(mut object) => match object.remove(key) {
      Some(Value::Array(items)) => Ok(items),
      _ => Err(Error::SourceShape {
        path: path.to_owned(),
      }),
    },
    _ => Err(Error::SourceShape {
      path: path.to_owned(),
    }),
  }
}

impl SourceProvider for FotmobClient {
  type Error = Error;

  async fn league_matches(&self) -> Result<Vec<Value>> {
    let path = format!("leagues/{}/matches", self.config.league_id);
    let value = self.fetch(&path).await?;
    list_from(value, "matches", &path)
  }

  async fn team_details(&self, team_id: &str) -> Result<Value> {
    self.fetch(&format!("teams/{team_id}")).await
  }

  async fn player_details(&self, player_id: &str) -> Result<Value> {
    self.fetch(&format!("players/{player_id}")).await
  }

  async fn match_events(&self, match_id: &str) -> Result<Vec<Value>> {
    let path = format!("matches/{match_id}/events");
    let value = self.fetch(&path).await?;
    list_from(value, "events", &path)
  }
}
