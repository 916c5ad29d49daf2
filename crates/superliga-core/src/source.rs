//! The `SourceProvider` trait — the seam to the upstream football-data API.
//!
//! The provider's endpoint paths and payload shapes are unstable and
//! reverse-engineered, so the seam deliberately yields raw
//! [`serde_json::Value`] records. Validation into domain records happens at
//! the ingestion boundary, not here, and the raw payloads are what the
//! collector writes to its audit artifacts.

use std::future::Future;

use serde_json::Value;

/// One season's worth of upstream data, fetched record-by-record.
///
/// Implementations issue one request per call and block (await) until it
/// completes; the collector drives them strictly sequentially.
pub trait SourceProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The raw match list for the configured league and season.
  fn league_matches(
    &self,
  ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send + '_;

  /// Raw details for one team.
  fn team_details<'a>(
    &'a self,
    team_id: &'a str,
  ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'a;

  /// Raw details for one player.
  fn player_details<'a>(
    &'a self,
    player_id: &'a str,
  ) -> impl Future<Output = Result<Value, Self::Error>> + Send + 'a;

  /// The raw event list for one match.
  fn match_events<'a>(
    &'a self,
    match_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Value>, Self::Error>> + Send + 'a;
}
