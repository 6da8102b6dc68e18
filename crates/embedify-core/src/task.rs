//! Build tasks: which fragments make up which output document.

use std::path::{Path, PathBuf};

/// An ordered list of source fragments and the document they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTask {
    /// Source fragments, concatenated in order.
    pub sources: Vec<PathBuf>,

    /// Path of the default output document.
    pub dest: PathBuf,
}

impl BuildTask {
    /// Create a new task.
    pub fn new<I, P>(sources: I, dest: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            dest: dest.into(),
        }
    }

    /// The fragment whose directory anchors partial references.
    #[must_use]
    pub fn primary_source(&self) -> Option<&Path> {
        self.sources.first().map(PathBuf::as_path)
    }
}
