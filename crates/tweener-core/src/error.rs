//! Error types.

use serde::{Deserialize, Serialize};

/// Errors surfaced by the name-based path lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PathError {
    /// No path function registered under this name.
    #[error("unknown path function: {name}")]
    UnknownPath { name: String },
}
