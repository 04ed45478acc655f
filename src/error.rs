use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RemoteOp {
    List,
    Put,
    Delete,
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Put => "put",
            Self::Delete => "delete",
        })
    }
}

/// A remote call that did not complete: which operation, on which path, and
/// the transport or server detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote {op} failed for '{path}': {message}")]
pub(crate) struct RemoteError {
    pub(crate) op: RemoteOp,
    pub(crate) path: String,
    pub(crate) message: String,
}

impl RemoteError {
    pub(crate) fn new(op: RemoteOp, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum StoreError {
    #[error("path already exists: {0}")]
    PathConflict(String),
    #[error("no such path: {0}")]
    NotFound(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
