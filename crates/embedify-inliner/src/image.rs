//! Image inlining.
//!
//! `<img src>` references become base64 `data:` URIs, or whatever the image
//! hook substitutes. `<img spritemap>` references to sprite atlas
//! descriptors are replaced by a compact JSON map of frame geometry.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use embedify_core::{ImageDecision, Options};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    error::{InlineError, Result},
    fs::{FileSystem, read_text},
    matcher::{Inlined, TagMatch, replace_images, replace_spritemaps},
    partial::PartialContext,
};

/// References containing this are already embedded data.
const BASE64_MARKER: &str = "base64";

/// Inline every local image and sprite atlas in `markup`.
pub fn inline_images(
    markup: &str,
    partial: &PartialContext,
    options: &Options,
    fs: &impl FileSystem,
) -> Result<Inlined> {
    if !options.tags.img.is_enabled() {
        return Ok(Inlined {
            markup: markup.to_string(),
            files: Vec::new(),
        });
    }

    let mut files = Vec::new();

    let markup = replace_images(markup, |m| {
        let (tag, encoded) = inline_image(m, partial, options, fs)?;
        files.extend(encoded);
        Ok::<_, InlineError>(tag)
    })?;

    let markup = replace_spritemaps(&markup, |m| {
        let name = partial.resolve(m.path);
        if options.is_ignored(m.path) || options.is_ignored(&name) {
            debug!(path = %name, "sprite atlas ignored");
            return Ok(m.full.to_string());
        }

        let path = options.resolve(&name);
        let descriptor = read_text(fs, &path)?;
        let frames = reduce_sprite_atlas(&descriptor, &path)?;
        files.push(name);

        Ok::<_, InlineError>(format!("{}'{frames}'{}", m.prefix, m.suffix))
    })?;

    if !files.is_empty() {
        info!(images = ?files, "inlined images");
    }

    Ok(Inlined { markup, files })
}

/// Replacement for one `<img src>` tag, plus the reference name when the
/// image was encoded from disk.
fn inline_image(
    m: &TagMatch<'_>,
    partial: &PartialContext,
    options: &Options,
    fs: &impl FileSystem,
) -> Result<(String, Option<String>)> {
    if m.path.contains(BASE64_MARKER) {
        return Ok((m.full.to_string(), None));
    }

    let name = partial.resolve(m.path);
    if options.is_ignored(m.path) || options.is_ignored(&name) {
        debug!(path = %name, "image ignored");
        return Ok((m.full.to_string(), None));
    }

    let path = options.resolve(&name);
    let decision = match options.tags.img.remap() {
        Some(hook) => hook(&path),
        None => ImageDecision::Encode,
    };

    match decision {
        ImageDecision::Decline => Err(InlineError::EncodingDeclined { path: name }),
        ImageDecision::Replace(text) => {
            debug!(path = %name, "image replaced by hook");
            Ok((m.with_path(&text), None))
        }
        ImageDecision::Encode => {
            let bytes = fs.read(&path).map_err(|e| InlineError::read(&path, e))?;
            let uri = data_uri(&name, &bytes);
            Ok((m.with_path(&uri), Some(name)))
        }
    }
}

/// MIME subtype for an image path: its lowercase extension, `png` when
/// there is none, with `jpg` spelled `jpeg`.
#[must_use]
pub fn image_type(name: &str) -> String {
    let ext = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "png".to_string());

    if ext == "jpg" { "jpeg".to_string() } else { ext }
}

/// Base64 `data:` URI for image bytes.
#[must_use]
pub fn data_uri(name: &str, bytes: &[u8]) -> String {
    format!(
        "data:image/{};charset=utf-8;base64,{}",
        image_type(name),
        STANDARD.encode(bytes)
    )
}

/// Reduce a sprite atlas descriptor to `{frame name: geometry}`.
///
/// Only each frame's `frame` rectangle is kept; frames without one are
/// dropped. Key order follows the descriptor.
pub fn reduce_sprite_atlas(descriptor: &str, path: &Path) -> Result<String> {
    let atlas: Value = serde_json::from_str(descriptor)
        .map_err(|e| InlineError::sprite_atlas(path, e))?;

    let frames = atlas
        .get("frames")
        .and_then(Value::as_object)
        .ok_or_else(|| InlineError::SpriteAtlasFrames {
            path: path.to_path_buf(),
        })?;

    let reduced: Map<String, Value> = frames
        .iter()
        .filter_map(|(name, entry)| Some((name.clone(), entry.get("frame")?.clone())))
        .collect();

    Ok(Value::Object(reduced).to_string())
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use embedify_core::{ImageHook, TagSetting, Tags};
    use tempfile::TempDir;

    use super::*;
    use crate::fs::StdFileSystem;

    fn options(dir: &TempDir) -> Options {
        Options::new(dir.path())
    }

    fn options_with_hook(dir: &TempDir, hook: ImageHook) -> Options {
        Options::new(dir.path()).with_tags(Tags {
            img: TagSetting::Remap(hook),
            ..Tags::default()
        })
    }

    #[test]
    fn test_image_type() {
        assert_eq!(image_type("photo.jpg"), "jpeg");
        assert_eq!(image_type("photo.JPG"), "jpeg");
        assert_eq!(image_type("icon.png"), "png");
        assert_eq!(image_type("anim.gif"), "gif");
        assert_eq!(image_type("vector.svg"), "svg");
        assert_eq!(image_type("noext"), "png");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(
            data_uri("a.png", b"abc"),
            "data:image/png;charset=utf-8;base64,YWJj"
        );
    }

    #[test]
    fn test_inline_jpeg() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("photo.jpg"), b"\xff\xd8\xff").unwrap();

        let out = inline_images(
            r#"<img src="photo.jpg" alt="x">"#,
            &PartialContext::default(),
            &options(&dir),
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(
            out.markup,
            r#"<img src="data:image/jpeg;charset=utf-8;base64,/9j/" alt="x">"#
        );
        assert_eq!(out.files, vec!["photo.jpg"]);
    }

    #[test]
    fn test_already_embedded_untouched() {
        let dir = TempDir::new().unwrap();
        let html = r#"<img src="data:image/png;base64,AAAA">"#;

        let out = inline_images(html, &PartialContext::default(), &options(&dir), &StdFileSystem)
            .unwrap();

        assert_eq!(out.markup, html);
        assert!(out.files.is_empty());
    }

    #[test]
    fn test_ignored_image_not_read() {
        let dir = TempDir::new().unwrap();
        let html = r#"<img src="missing.png">"#;
        let options = options(&dir).with_ignored(["missing.png"]);

        let out = inline_images(html, &PartialContext::default(), &options, &StdFileSystem)
            .unwrap();

        assert_eq!(out.markup, html);
    }

    #[test]
    fn test_missing_image_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = inline_images(
            r#"<img src="missing.png">"#,
            &PartialContext::default(),
            &options(&dir),
            &StdFileSystem,
        )
        .unwrap_err();

        assert!(matches!(err, InlineError::Read { .. }));
    }

    #[test]
    fn test_disabled_leaves_markup() {
        let dir = TempDir::new().unwrap();
        let html = r#"<img src="missing.png"><img spritemap="missing.json" />"#;
        let options = options(&dir).with_tags(Tags {
            img: TagSetting::Disabled,
            ..Tags::default()
        });

        let out = inline_images(html, &PartialContext::default(), &options, &StdFileSystem)
            .unwrap();
        assert_eq!(out.markup, html);
    }

    #[test]
    fn test_hook_decline_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"png").unwrap();
        let options = options_with_hook(&dir, Arc::new(|_: &Path| ImageDecision::Decline));

        let err = inline_images(
            r#"<img src="a.png">"#,
            &PartialContext::default(),
            &options,
            &StdFileSystem,
        )
        .unwrap_err();

        assert!(matches!(err, InlineError::EncodingDeclined { ref path } if path == "a.png"));
    }

    #[test]
    fn test_hook_replacement_text() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("img/a.png");
        let options = options_with_hook(
            &dir,
            Arc::new(move |path: &Path| {
                assert_eq!(path, expected);
                ImageDecision::Replace("/cdn/a.png".to_string())
            }),
        );

        let out = inline_images(
            r#"<img src="img/a.png">"#,
            &PartialContext::default(),
            &options,
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(out.markup, r#"<img src="/cdn/a.png">"#);
    }

    #[test]
    fn test_hook_encode_uses_default() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.gif"), b"abc").unwrap();
        let options = options_with_hook(&dir, Arc::new(|_: &Path| ImageDecision::Encode));

        let out = inline_images(
            r#"<img src="a.gif">"#,
            &PartialContext::default(),
            &options,
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(
            out.markup,
            r#"<img src="data:image/gif;charset=utf-8;base64,YWJj">"#
        );
    }

    #[test]
    fn test_local_image_in_partial() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("partials")).unwrap();
        fs::write(dir.path().join("partials/dot.png"), b"abc").unwrap();

        let out = inline_images(
            r#"<img src="{local}dot.png">"#,
            &PartialContext::new("partials"),
            &options(&dir),
            &StdFileSystem,
        )
        .unwrap();

        assert!(out.markup.contains("base64,YWJj"));
        assert_eq!(out.files, vec!["partials/dot.png"]);
    }

    #[test]
    fn test_reduce_sprite_atlas() {
        let descriptor = r#"{"frames":{"a":{"frame":{"x":1,"y":2,"w":3,"h":4},"other":"x"}}}"#;
        let reduced = reduce_sprite_atlas(descriptor, Path::new("atlas.json")).unwrap();
        assert_eq!(reduced, r#"{"a":{"x":1,"y":2,"w":3,"h":4}}"#);
    }

    #[test]
    fn test_reduce_sprite_atlas_keeps_order_and_drops_frameless() {
        let descriptor = r#"{"frames":{
            "z":{"frame":{"x":0,"y":0,"w":1,"h":1},"rotated":false},
            "b":{"trimmed":true},
            "a":{"frame":{"x":1,"y":1,"w":1,"h":1}}
        },"meta":{"app":"packer"}}"#;
        let reduced = reduce_sprite_atlas(descriptor, Path::new("atlas.json")).unwrap();
        assert_eq!(
            reduced,
            r#"{"z":{"x":0,"y":0,"w":1,"h":1},"a":{"x":1,"y":1,"w":1,"h":1}}"#
        );
    }

    #[test]
    fn test_malformed_sprite_atlas() {
        let err = reduce_sprite_atlas("{not json", Path::new("atlas.json")).unwrap_err();
        assert!(matches!(err, InlineError::SpriteAtlas { .. }));

        let err = reduce_sprite_atlas(r#"{"meta":{}}"#, Path::new("atlas.json")).unwrap_err();
        assert!(matches!(err, InlineError::SpriteAtlasFrames { .. }));
    }

    #[test]
    fn test_inline_spritemap() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("atlas.json"),
            r#"{"frames":{"a":{"frame":{"x":1,"y":2,"w":3,"h":4},"other":"x"}}}"#,
        )
        .unwrap();

        let out = inline_images(
            r#"<img spritemap="atlas.json" class="sprite">"#,
            &PartialContext::default(),
            &options(&dir),
            &StdFileSystem,
        )
        .unwrap();

        assert_eq!(
            out.markup,
            r#"<img spritemap='{"a":{"x":1,"y":2,"w":3,"h":4}}' class="sprite">"#
        );
    }
}
