//! Rendering engines that get their own stylesheet permutation.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// A rendering engine with its own optional stylesheet variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Webkit,
    Trident,
    Gecko,
}

impl Engine {
    /// Every engine, in the order permutations are built.
    pub const ALL: [Engine; 3] = [Engine::Webkit, Engine::Trident, Engine::Gecko];

    /// Lowercase name used in file name suffixes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Webkit => "webkit",
            Self::Trident => "trident",
            Self::Gecko => "gecko",
        }
    }

    /// Engine-specific name for a stylesheet reference.
    ///
    /// `css/app.css` becomes `css/app.webkit.css`. A reference without a
    /// `.css` suffix keeps its full name and gains `.webkit.css`.
    #[must_use]
    pub fn stylesheet_variant(self, name: &str) -> String {
        let stem = name.strip_suffix(".css").unwrap_or(name);
        format!("{stem}.{}.css", self.as_str())
    }

    /// Engine-specific output path for a destination document.
    ///
    /// The engine name is inserted before the final extension
    /// (`build/index.html` becomes `build/index.webkit.html`), or appended
    /// when the destination has no extension.
    #[must_use]
    pub fn document_variant(self, dest: &Path) -> PathBuf {
        match dest.extension() {
            Some(ext) => {
                dest.with_extension(format!("{}.{}", self.as_str(), ext.to_string_lossy()))
            }
            None => dest.with_extension(self.as_str()),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
