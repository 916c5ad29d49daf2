//! Error type for `superliga-store-rest`.

use reqwest::StatusCode;
use superliga_core::store::Table;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Required connection credentials were absent at construction. Fatal:
  /// the store must refuse to initialise rather than run with undefined
  /// connectivity.
  #[error("missing store credential: {0}")]
  Config(&'static str),

  /// The store could not be reached at all.
  #[error("transport failure: {0}")]
  Transport(#[source] reqwest::Error),

  /// The store answered but rejected the operation (auth failure, schema
  /// mismatch, malformed payload).
  #[error("store rejected operation on `{table}`: http {status}")]
  Rejected { table: Table, status: StatusCode },

  /// The store answered 2xx but the body did not deserialise into the
  /// expected records.
  #[error("could not decode `{table}` response: {source}")]
  Decode {
    table:  Table,
    #[source]
    source: reqwest::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
