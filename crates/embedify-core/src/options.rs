//! Runtime options for one inlining run.
//!
//! Each resource kind is configured independently: off, on, or on with a
//! caller-supplied function that remaps paths (or, for images, decides how
//! the image is embedded).

use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::engine::Engine;

/// Remaps a stylesheet reference before it is read.
///
/// Receives the reference path (relative to `relative_to`) and the engine
/// being permuted, or `None` for the default build.
pub type StylesheetRemap = Arc<dyn Fn(&str, Option<Engine>) -> String + Send + Sync>;

/// Remaps the resolved path of a script before it is read.
pub type ScriptRemap = Arc<dyn Fn(&Path) -> PathBuf + Send + Sync>;

/// Decides how an image at the given resolved path is embedded.
pub type ImageHook = Arc<dyn Fn(&Path) -> ImageDecision + Send + Sync>;

/// Outcome of an [`ImageHook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageDecision {
    /// Refuse to encode the image. Aborts the run.
    Decline,
    /// Use this literal text in place of the reference.
    Replace(String),
    /// Proceed with the default base64 encoding.
    Encode,
}

/// Behavior for one kind of tag.
#[derive(Clone)]
pub enum TagSetting<F> {
    /// Leave tags of this kind untouched.
    Disabled,
    /// Inline using the default path resolution.
    Enabled,
    /// Inline, letting the function adjust the resolution.
    Remap(F),
}

impl<F> TagSetting<F> {
    /// Whether tags of this kind are inlined at all.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// The configured function, if any.
    #[must_use]
    pub fn remap(&self) -> Option<&F> {
        match self {
            Self::Remap(f) => Some(f),
            _ => None,
        }
    }
}

impl<F> Default for TagSetting<F> {
    fn default() -> Self {
        Self::Enabled
    }
}

impl<F> From<bool> for TagSetting<F> {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

impl<F> fmt::Debug for TagSetting<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Enabled => f.write_str("Enabled"),
            Self::Remap(_) => f.write_str("Remap(..)"),
        }
    }
}

/// Per-kind tag settings.
#[derive(Debug, Clone, Default)]
pub struct Tags {
    /// `<link rel="stylesheet">` handling.
    pub stylesheet: TagSetting<StylesheetRemap>,

    /// `<script src>` handling.
    pub script: TagSetting<ScriptRemap>,

    /// `<img src>` and `<img spritemap>` handling.
    pub img: TagSetting<ImageHook>,
}

/// Options shared by every task in a run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Base directory every referenced file is resolved against.
    pub relative_to: PathBuf,

    /// Per-kind tag behavior.
    pub tags: Tags,

    /// Literal reference paths that are never inlined.
    pub files_ignore: BTreeSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            relative_to: PathBuf::from("."),
            tags: Tags::default(),
            files_ignore: BTreeSet::new(),
        }
    }
}

impl Options {
    /// Create options resolving references against `relative_to`.
    #[must_use]
    pub fn new(relative_to: impl Into<PathBuf>) -> Self {
        Self {
            relative_to: relative_to.into(),
            ..Self::default()
        }
    }

    /// Set the tag settings.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Add references to the ignore list.
    #[must_use]
    pub fn with_ignored<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files_ignore.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Whether a reference path is on the ignore list.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.files_ignore.contains(path)
    }

    /// Join a reference path onto `relative_to`.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.relative_to.join(path)
    }
}
