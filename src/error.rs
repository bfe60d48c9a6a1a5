use std::path::PathBuf;
use thiserror::Error;

/// Which kind of input record a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Entity,
    Relationship,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Entity => write!(f, "entity"),
            RecordKind::Relationship => write!(f, "relationship"),
        }
    }
}

#[derive(Debug, Error)]
pub enum KgError {
    #[error("malformed {kind} record #{index}: field `{field}` is missing or empty")]
    MalformedInput {
        kind: RecordKind,
        index: usize,
        field: &'static str,
    },

    #[error("invalid relationship type {0:?}")]
    InvalidRelationType(String),

    #[error("graph store unavailable: {0}")]
    StoreUnavailable(#[source] reqwest::Error),

    #[error("graph store rejected the request ({code}): {message}")]
    Store { code: String, message: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KgError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KgError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = KgError> = std::result::Result<T, E>;
