//! Path resolution for partial fragments.
//!
//! A partial is concatenated into many pages but still has to find its own
//! assets. References inside it may carry one of two markers:
//!
//! - `{global}` is stripped and the rest is taken relative to `relative_to`.
//! - `{local}` is stripped and the rest is taken relative to the directory
//!   the task's first source fragment lives in.

use std::path::{Path, PathBuf};

use tracing::warn;

/// Marker for paths relative to the shared base directory.
pub const GLOBAL_MARKER: &str = "{global}";

/// Marker for paths relative to the fragment's own directory.
pub const LOCAL_MARKER: &str = "{local}";

/// Directory of a task's fragments, relative to `relative_to`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialContext {
    dir: PathBuf,
}

impl PartialContext {
    /// Context for fragments living in `dir` (relative to `relative_to`).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Context for a task whose first fragment is `source`.
    #[must_use]
    pub fn for_source(relative_to: &Path, source: &Path) -> Self {
        let source_dir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let dir = match (absolute(source_dir), absolute(relative_to)) {
            (Some(from), Some(base)) => pathdiff::diff_paths(from, base),
            _ => None,
        };

        match dir {
            Some(dir) => Self { dir },
            None => {
                warn!(
                    source = %source.display(),
                    relative_to = %relative_to.display(),
                    "cannot place source relative to base directory, using it as is"
                );
                Self::new(source_dir)
            }
        }
    }

    /// The fragment directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Apply the `{global}` and `{local}` markers to a reference path.
    ///
    /// Paths without either marker come back unchanged.
    #[must_use]
    pub fn resolve(&self, path: &str) -> String {
        let mut resolved = path.replacen(GLOBAL_MARKER, "", 1);

        if resolved.contains(LOCAL_MARKER) {
            let rest = resolved.replacen(LOCAL_MARKER, "", 1);
            let rest = rest.trim_start_matches('/');
            resolved = if self.dir.as_os_str().is_empty() {
                rest.to_string()
            } else {
                self.dir.join(rest).to_string_lossy().replace('\\', "/")
            };
        }

        resolved
    }
}

fn absolute(path: &Path) -> Option<PathBuf> {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    std::path::absolute(path).ok()
}
