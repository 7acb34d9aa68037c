//! Error types for `sauna-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown persona state: {0:?}")]
  UnknownPersonaState(String),

  #[error("unknown persona state code: {0}")]
  UnknownPersonaStateCode(u64),

  #[error("malformed roster snapshot: {0}")]
  Snapshot(#[source] serde_json::Error),

  #[error("malformed presence event: {0}")]
  Event(#[source] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
