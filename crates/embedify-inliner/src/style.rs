//! Stylesheet inlining for the default build.

use embedify_core::Options;
use tracing::{debug, info};

use crate::{
    error::{InlineError, Result},
    fs::{FileSystem, read_text},
    matcher::{Inlined, replace_stylesheets},
    partial::PartialContext,
};

/// Replace every local stylesheet link with a `<style>` block.
///
/// A missing stylesheet is fatal. The remap function, if configured, sees
/// the reference path with no engine.
pub fn inline_stylesheets(
    markup: &str,
    partial: &PartialContext,
    options: &Options,
    fs: &impl FileSystem,
) -> Result<Inlined> {
    if !options.tags.stylesheet.is_enabled() {
        return Ok(Inlined {
            markup: markup.to_string(),
            files: Vec::new(),
        });
    }

    let mut files = Vec::new();

    let markup = replace_stylesheets(markup, |m| {
        let mut name = partial.resolve(m.path);
        if options.is_ignored(m.path) || options.is_ignored(&name) {
            debug!(path = %name, "stylesheet ignored");
            return Ok(m.full.to_string());
        }

        files.push(name.clone());
        if let Some(remap) = options.tags.stylesheet.remap() {
            name = remap(&name, None);
        }

        let css = read_text(fs, &options.resolve(&name))?;
        Ok::<_, InlineError>(format!("<style>{css}</style>"))
    })?;

    if !files.is_empty() {
        info!(stylesheets = ?files, "inlined stylesheets");
    }

    Ok(Inlined { markup, files })
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use embedify_core::{Engine, TagSetting, Tags};
    use tempfile::TempDir;

    use super::*;
    use crate::fs::StdFileSystem;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("css/a.css"), "a{}").unwrap();
        fs::write(dir.path().join("css/b.css"), "b{}").unwrap();
        dir
    }

    #[test]
    fn test_inline_both_orders() {
        let dir = site();
        let html = concat!(
            r#"<link href="css/a.css" rel="stylesheet" />"#,
            r#"<link rel="stylesheet" type="text/css" href="css/b.css">"#,
        );

        let out = inline_stylesheets(
            html,
            &PartialContext::default(),
            &Options::new(dir.path()),
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(out.markup, "<style>a{}</style><style>b{}</style>");
        assert_eq!(out.files, vec!["css/a.css", "css/b.css"]);
    }

    #[test]
    fn test_idempotent_on_inlined_markup() {
        let dir = site();
        let html = "<style>a{}</style><script>x()</script>";

        let out = inline_stylesheets(
            html,
            &PartialContext::default(),
            &Options::new(dir.path()),
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(out.markup, html);
        assert!(out.files.is_empty());
    }

    #[test]
    fn test_missing_stylesheet_is_fatal() {
        let dir = site();
        let result = inline_stylesheets(
            r#"<link href="css/missing.css" rel="stylesheet">"#,
            &PartialContext::default(),
            &Options::new(dir.path()),
            &StdFileSystem,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_remap_without_engine() {
        let dir = site();
        let options = Options::new(dir.path()).with_tags(Tags {
            stylesheet: TagSetting::Remap(Arc::new(|name: &str, engine: Option<Engine>| {
                assert!(engine.is_none());
                name.replace("a.css", "b.css")
            })),
            ..Tags::default()
        });

        let out = inline_stylesheets(
            r#"<link href="css/a.css" rel="stylesheet">"#,
            &PartialContext::default(),
            &options,
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(out.markup, "<style>b{}</style>");
        assert_eq!(out.files, vec!["css/a.css"]);
    }

    #[test]
    fn test_global_marker_in_partial() {
        let dir = site();
        let out = inline_stylesheets(
            r#"<link href="{global}css/a.css" rel="stylesheet">"#,
            &PartialContext::new("partials"),
            &Options::new(dir.path()),
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(out.markup, "<style>a{}</style>");
    }

    #[test]
    fn test_ignored_stylesheet_kept() {
        let dir = site();
        let html = r#"<link href="css/print.css" rel="stylesheet">"#;
        let options = Options::new(dir.path()).with_ignored(["css/print.css"]);

        let out = inline_stylesheets(html, &PartialContext::default(), &options, &StdFileSystem)
            .unwrap();

        assert_eq!(out.markup, html);
    }
}
