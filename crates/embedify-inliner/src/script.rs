//! Script inlining.

use embedify_core::Options;
use tracing::{debug, info};

use crate::{
    error::{InlineError, Result},
    fs::{FileSystem, read_text},
    matcher::{Inlined, replace_scripts},
    partial::PartialContext,
};

/// Replace every local `<script src="..."></script>` with an inline script block.
///
/// Does nothing when scripts are disabled. Ignored references stay as written.
pub fn inline_scripts(
    markup: &str,
    partial: &PartialContext,
    options: &Options,
    fs: &impl FileSystem,
) -> Result<Inlined> {
    if !options.tags.script.is_enabled() {
        return Ok(Inlined {
            markup: markup.to_string(),
            files: Vec::new(),
        });
    }

    let mut files = Vec::new();

    let markup = replace_scripts(markup, |m| {
        let name = partial.resolve(m.path);
        if options.is_ignored(m.path) || options.is_ignored(&name) {
            debug!(path = %name, "script ignored");
            return Ok(m.full.to_string());
        }

        let mut path = options.resolve(&name);
        if let Some(remap) = options.tags.script.remap() {
            path = remap(&path);
        }

        let source = read_text(fs, &path)?;
        files.push(path.display().to_string());
        Ok::<_, InlineError>(format!("<script>{source}</script>"))
    })?;

    if !files.is_empty() {
        info!(scripts = ?files, "inlined script tags");
    }

    Ok(Inlined { markup, files })
}
