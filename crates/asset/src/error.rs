//! Errors produced while opening and decoding a scene.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// The document or one of its binary buffers violates the supported subset of the format.
    #[error("Scene format error: {0}")]
    Format(String),

    /// A node id/name or material id has no counterpart in the document.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed scene document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("Failed to read resource {path:?}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SceneError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// `true` for both semantic format violations and unparseable document text.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Document(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
