//! Engine-specific stylesheet permutations.
//!
//! For every [`Engine`] the stylesheet links are replayed against
//! `<name>.<engine>.css` files. An engine whose files are not all present
//! produces no document at all; there are no partial variants.

use std::path::{Path, PathBuf};

use embedify_core::{Engine, Options};
use tracing::debug;

use crate::{
    fs::FileSystem,
    matcher::replace_stylesheets,
    partial::PartialContext,
};

/// A finished output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Engine this document targets, `None` for the default build.
    pub engine: Option<Engine>,

    /// Where the document is written.
    pub dest: PathBuf,

    /// Document markup.
    pub markup: String,

    /// Stylesheets embedded into this document.
    pub stylesheets: Vec<String>,
}

/// Why a variant was abandoned.
struct MissingVariant(PathBuf);

/// File name of the `engine` variant of a stylesheet reference.
fn variant_name(name: &str, engine: Engine, options: &Options) -> String {
    match options.tags.stylesheet.remap() {
        Some(remap) => remap(name, Some(engine)),
        None => engine.stylesheet_variant(name),
    }
}

/// Build the `engine` permutation of `markup`, if every stylesheet it
/// references has an engine variant.
///
/// Returns `None` when a variant file is missing or unreadable. Markup that
/// links no stylesheet still yields a variant.
pub fn build_variant(
    markup: &str,
    engine: Engine,
    dest: &Path,
    partial: &PartialContext,
    options: &Options,
    fs: &impl FileSystem,
) -> Option<RenderedDocument> {
    let mut stylesheets = Vec::new();

    let permuted = replace_stylesheets(markup, |m| {
        let name = partial.resolve(m.path);
        if options.is_ignored(m.path) || options.is_ignored(&name) {
            return Ok(m.full.to_string());
        }

        let file = variant_name(&name, engine, options);
        let path = options.resolve(&file);
        if !fs.exists(&path) {
            return Err(MissingVariant(path));
        }

        let css = fs
            .read_to_string(&path)
            .map_err(|_| MissingVariant(path.clone()))?;
        stylesheets.push(file);
        Ok(format!("<style>{css}</style>"))
    });

    match permuted {
        Ok(markup) => Some(RenderedDocument {
            engine: Some(engine),
            dest: engine.document_variant(dest),
            markup,
            stylesheets,
        }),
        Err(MissingVariant(path)) => {
            debug!(%engine, missing = %path.display(), "skipping engine permutation");
            None
        }
    }
}

/// Every available engine permutation, in [`Engine::ALL`] order.
pub fn build_permutations(
    markup: &str,
    dest: &Path,
    partial: &PartialContext,
    options: &Options,
    fs: &impl FileSystem,
) -> Vec<RenderedDocument> {
    Engine::ALL
        .into_iter()
        .filter_map(|engine| build_variant(markup, engine, dest, partial, options, fs))
        .collect()
}
