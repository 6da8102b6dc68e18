//! Error types for the inlining engine.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for inlining operations.
pub type Result<T> = std::result::Result<T, InlineError>;

/// Fatal inlining errors. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum InlineError {
    /// A referenced or source file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output document could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image hook refused to encode an image.
    #[error("failed to encode image {path}: callback declined")]
    EncodingDeclined { path: String },

    /// A sprite atlas descriptor is not valid JSON.
    #[error("invalid sprite atlas {path}: {source}")]
    SpriteAtlas {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A sprite atlas descriptor has no `frames` object.
    #[error("sprite atlas {path} has no frames object")]
    SpriteAtlasFrames { path: PathBuf },
}

impl InlineError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn sprite_atlas(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::SpriteAtlas {
            path: path.into(),
            source,
        }
    }
}
