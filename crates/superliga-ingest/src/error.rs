//! Error type for `superliga-ingest`.
//!
//! Only two things abort a pass: failing to write an audit artifact and
//! failing to serialise one. Every provider or store failure — the match
//! list included — is recorded as a skipped item on the run report and the
//! pass continues.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport-level failure reaching the source provider.
  #[error("http transport: {0}")]
  Http(#[source] reqwest::Error),

  /// The provider answered with a non-success status.
  #[error("source returned http {status} for `{path}`")]
  SourceStatus {
    path:   String,
    status: reqwest::StatusCode,
  },

  /// The provider answered 2xx but the payload was not the expected shape.
  #[error("unexpected payload shape from `{path}`")]
  SourceShape { path: String },

  /// A local audit artifact could not be written.
  #[error("audit artifact `{path}`: {source}")]
  Audit {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// An audit payload could not be serialised.
  #[error("serialising audit payload: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
