//! Timestamped local audit artifacts.
//!
//! Every pass writes its raw payloads and tabular snapshots under a fixed
//! working directory before/alongside the store writes, so a run can be
//! diagnosed after the fact. Filenames embed one `YYYYMMDD_HHMMSS` stamp
//! per pass; nothing is ever rotated or cleaned up.

use std::{
  fs,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use superliga_core::record::{Match, Team};

use crate::{Error, Result};

/// Writes the artifacts of one ingestion pass.
pub struct AuditWriter {
  dir:   PathBuf,
  stamp: String,
}

impl AuditWriter {
  /// Prepare the artifact directory (created if absent) and fix the run
  /// stamp from `now`.
  pub fn create(dir: impl Into<PathBuf>, now: DateTime<Utc>) -> Result<Self> {
    let dir = dir.into();
    fs::create_dir_all(&dir).map_err(|source| Error::Audit {
      path: dir.clone(),
      source,
    })?;
    Ok(Self {
      stamp: now.format("%Y%m%d_%H%M%S").to_string(),
      dir,
    })
  }

  /// The `YYYYMMDD_HHMMSS` stamp embedded in every filename of this pass.
  pub fn stamp(&self) -> &str {
    &self.stamp
  }

  fn artifact(&self, name: &str, ext: &str) -> PathBuf {
    self.dir.join(format!("{name}_{}.{ext}", self.stamp))
  }

  /// Pretty-printed JSON dump, e.g. `matches_raw_20240801_180102.json`.
  pub fn write_json<T: Serialize + ?Sized>(
    &self,
    name: &str,
    value: &T,
  ) -> Result<PathBuf> {
    let body = serde_json::to_vec_pretty(value)?;
    self.write_bytes(self.artifact(name, "json"), &body)
  }

  /// Tabular snapshot of the mapped match list.
  pub fn write_matches_csv(&self, matches: &[Match]) -> Result<PathBuf> {
    let mut body = String::from("id,season,match_date,home_team_id,away_team_id\n");
    for m in matches {
      body.push_str(&csv_row(&[
        &m.id,
        &m.season,
        &m.match_date.to_rfc3339(),
        &m.home_team_id,
        &m.away_team_id,
      ]));
    }
    self.write_bytes(self.artifact("matches", "csv"), body.as_bytes())
  }

  /// Tabular snapshot of the teams fetched this pass.
  pub fn write_teams_csv(&self, teams: &[Team]) -> Result<PathBuf> {
    let mut body = String::from("id,name,short_name,crest_url\n");
    for team in teams {
      body.push_str(&csv_row(&[
        &team.id,
        &team.name,
        team.short_name.as_deref().unwrap_or(""),
        team.crest_url.as_deref().unwrap_or(""),
      ]));
    }
    self.write_bytes(self.artifact("teams", "csv"), body.as_bytes())
  }

  fn write_bytes(&self, path: PathBuf, body: &[u8]) -> Result<PathBuf> {
    fs::write(&path, body).map_err(|source| Error::Audit {
      path: path.clone(),
      source,
    })?;
    tracing::debug!(path = %path.display(), "wrote audit artifact");
    Ok(path)
  }
}

fn csv_row(fields: &[&str]) -> String {
  let mut row = String::new();
  for (i, field) in fields.iter().enumerate() {
    if i > 0 {
      row.push(',');
    }
    row.push_str(&csv_field(field));
  }
  row.push('\n');
  row
}

/// RFC 4180 quoting: only fields containing a delimiter, quote, or line
/// break are wrapped, with inner quotes doubled.
fn csv_field(field: &str) -> String {
  if field.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", field.replace('"', "\"\""))
  } else {
    field.to_owned()
  }
}

/// List the artifact paths of the pass identified by `stamp`, for tests and
/// tooling.
pub fn artifacts_for_stamp(dir: &Path, stamp: &str) -> std::io::Result<Vec<PathBuf>> {
  let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
    .filter_map(|entry| entry.ok().map(|e| e.path()))
    .filter(|path| {
      path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.contains(stamp))
    })
    .collect();
  paths.sort();
  Ok(paths)
}
