//! superliga-ingest binary.
//!
//! Reads `config.toml` (or the path given with `--config`, overlaid with
//! `SUPERLIGA_*` environment variables), builds the FotMob client and the
//! hosted store, runs one ingestion pass, logs the report, and exits.
//! Missing store credentials abort startup before any network call.

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use serde::Deserialize;
use superliga_ingest::{
  audit::AuditWriter,
  collector::Collector,
  fotmob::{DANISH_SUPERLIGA, FotmobClient, FotmobConfig},
};
use superliga_store_rest::{RestConfig, RestStore};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "One-shot Danish Superliga ingestion pass")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the audit artifact directory.
  #[arg(long)]
  data_dir: Option<PathBuf>,

  /// Override the season to ingest.
  #[arg(long)]
  season: Option<String>,
}

/// Settings accepted from the config file / environment. The store
/// credentials have no defaults on purpose.
#[derive(Debug, Deserialize)]
struct Settings {
  supabase_url: String,
  supabase_key: String,
  #[serde(default = "default_league_id")]
  league_id: String,
  #[serde(default = "default_season")]
  season: String,
  #[serde(default = "default_data_dir")]
  data_dir: PathBuf,
}

fn default_league_id() -> String {
  DANISH_SUPERLIGA.to_owned()
}

fn default_season() -> String {
  "2024-2025".to_owned()
}

fn default_data_dir() -> PathBuf {
  PathBuf::from("data")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SUPERLIGA"))
    .build()
    .context("failed to read configuration")?;

  let mut settings: Settings = settings
    .try_deserialize()
    .context("missing or malformed settings (supabase_url / supabase_key are required)")?;
  if let Some(dir) = cli.data_dir {
    settings.data_dir = dir;
  }
  if let Some(season) = cli.season {
    settings.season = season;
  }

  let store = RestStore::new(RestConfig {
    base_url: settings.supabase_url.clone(),
    api_key:  settings.supabase_key.clone(),
  })
  .context("store configuration rejected")?;

  let source = FotmobClient::new(FotmobConfig {
    league_id: settings.league_id.clone(),
    ..FotmobConfig::default()
  })
  .context("building source client")?;

  let audit = AuditWriter::create(&settings.data_dir, Utc::now())
    .context("preparing audit directory")?;

  tracing::info!(
    season = %settings.season,
    league_id = %settings.league_id,
    data_dir = %settings.data_dir.display(),
    "starting ingestion pass"
  );

  let collector = Collector::new(source, store, settings.season, audit);
  let report = collector.run().await.context("ingestion pass failed")?;

  for item in &report.skipped {
    tracing::warn!(stage = ?item.stage, id = %item.id, reason = %item.reason, "skipped");
  }
  tracing::info!(
    matches = report.matches_upserted,
    teams = report.teams_upserted,
    players = report.players_upserted,
    events = report.events_upserted,
    quarantined = report.quarantined,
    skipped = report.skipped.len(),
    "ingestion pass complete"
  );

  Ok(())
}
