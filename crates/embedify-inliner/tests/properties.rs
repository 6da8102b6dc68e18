//! End-to-end checks of the inlining guarantees.

use std::{
    fs,
    path::{Path, PathBuf},
};

use embedify_core::{BuildTask, Options};
use embedify_inliner::Builder;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
    fs::write(path, contents).expect("write");
}

fn build_page(root: &Path, page: &str, options: Options) -> String {
    write(root, "page.html", page);
    let task = BuildTask::new([root.join("page.html")], root.join("out/page.html"));
    Builder::new(options).build(&[task]).expect("build");
    fs::read_to_string(root.join("out/page.html")).expect("read output")
}

fn outputs(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = fs::read_dir(root.join("out"))
        .expect("out dir")
        .map(|e| e.expect("entry").path())
        .collect();
    files.sort();
    files
}

#[test]
fn test_stylesheet_content_replaces_link() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "css/site.css", "h1 { color: red; }");

    let out = build_page(
        dir.path(),
        r#"<head><link rel="stylesheet" href="css/site.css"></head>"#,
        Options::new(dir.path()),
    );

    assert_eq!(out, "<head><style>h1 { color: red; }</style></head>");
    assert!(!out.contains("<link"));
}

#[test]
fn test_remote_references_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let page = concat!(
        r#"<link href="//fonts.example.com/f.css" rel="stylesheet">"#,
        r#"<script src="https://cdn.example.com/lib.js"></script>"#,
        r#"<img src="http://img.example.com/a.png">"#,
    );

    let out = build_page(dir.path(), page, Options::new(dir.path()));

    assert_eq!(out, page);
}

#[test]
fn test_base64_image_unchanged() {
    let dir = TempDir::new().unwrap();
    let page = r#"<img src="data:image/gif;base64,R0lGODlhAQABAAAAACw=">"#;

    let out = build_page(dir.path(), page, Options::new(dir.path()));

    assert_eq!(out, page);
}

#[test]
fn test_inlined_markup_is_fixed_point() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.css", "a{}");
    write(dir.path(), "a.js", "a()");

    let first = build_page(
        dir.path(),
        r#"<link href="a.css" rel="stylesheet"><script src="a.js"></script>"#,
        Options::new(dir.path()),
    );
    let second = build_page(dir.path(), &first, Options::new(dir.path()));

    assert_eq!(first, second);
}

#[test]
fn test_only_webkit_variant_written() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.css", "default{}");
    write(dir.path(), "a.webkit.css", "webkit{}");

    build_page(
        dir.path(),
        r#"<link href="a.css" rel="stylesheet">"#,
        Options::new(dir.path()),
    );

    assert_eq!(
        outputs(dir.path()),
        vec![
            dir.path().join("out/page.html"),
            dir.path().join("out/page.webkit.html"),
        ]
    );
    let webkit = fs::read_to_string(dir.path().join("out/page.webkit.html")).unwrap();
    assert_eq!(webkit, "<style>webkit{}</style>");
}

#[test]
fn test_every_variant_without_stylesheets() {
    let dir = TempDir::new().unwrap();

    let out = build_page(dir.path(), "<p>plain</p>", Options::new(dir.path()));

    assert_eq!(out, "<p>plain</p>");
    assert_eq!(
        outputs(dir.path()),
        vec![
            dir.path().join("out/page.gecko.html"),
            dir.path().join("out/page.html"),
            dir.path().join("out/page.trident.html"),
            dir.path().join("out/page.webkit.html"),
        ]
    );
    let gecko = fs::read_to_string(dir.path().join("out/page.gecko.html")).unwrap();
    assert_eq!(gecko, "<p>plain</p>");
}

#[test]
fn test_extension_to_mime() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "photo.jpg", [0xffu8, 0xd8, 0xff]);
    write(dir.path(), "icon.png", b"png");

    let out = build_page(
        dir.path(),
        r#"<img src="photo.jpg"><img src="icon.png">"#,
        Options::new(dir.path()),
    );

    assert!(out.contains(r#"<img src="data:image/jpeg;charset=utf-8;base64,"#));
    assert!(out.contains(r#"<img src="data:image/png;charset=utf-8;base64,"#));
}

#[test]
fn test_sprite_atlas_reduction() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "sprites/atlas.json",
        r#"{"frames":{"a":{"frame":{"x":1,"y":2,"w":3,"h":4},"other":"x"}}}"#,
    );

    let out = build_page(
        dir.path(),
        r#"<img spritemap="sprites/atlas.json" />"#,
        Options::new(dir.path()),
    );

    assert_eq!(out, r#"<img spritemap='{"a":{"x":1,"y":2,"w":3,"h":4}}' />"#);
}

#[test]
fn test_ignored_references_never_read() {
    let dir = TempDir::new().unwrap();
    let page = concat!(
        r#"<link href="missing.css" rel="stylesheet">"#,
        r#"<script src="missing.js"></script>"#,
        r#"<img src="missing.png">"#,
    );
    let options =
        Options::new(dir.path()).with_ignored(["missing.css", "missing.js", "missing.png"]);

    let out = build_page(dir.path(), page, options);

    assert_eq!(out, page);
}

#[test]
fn test_malformed_sprite_atlas_fails() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "atlas.json", "{ frames: ");
    write(dir.path(), "page.html", r#"<img spritemap="atlas.json" />"#);
    let task = BuildTask::new([dir.path().join("page.html")], dir.path().join("out/page.html"));

    let err = Builder::new(Options::new(dir.path()))
        .build(&[task])
        .unwrap_err();

    assert!(err.to_string().contains("atlas.json"));
}

#[test]
fn test_partial_resolves_global_assets() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/home.html", "<main></main>");
    write(
        dir.path(),
        "pages/widgets/badge.html",
        r#"<link href="{global}css/base.css" rel="stylesheet">"#,
    );
    write(dir.path(), "css/base.css", "base{}");

    let task = BuildTask::new(
        [
            dir.path().join("pages/home.html"),
            dir.path().join("pages/widgets/badge.html"),
        ],
        dir.path().join("out/home.html"),
    );
    Builder::new(Options::new(dir.path()))
        .build(&[task])
        .expect("build");

    let out = fs::read_to_string(dir.path().join("out/home.html")).unwrap();
    assert_eq!(out, "<main></main>\n<style>base{}</style>");
}

#[test]
fn test_partial_resolves_local_assets() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pages/home.html", "<main></main>");
    write(
        dir.path(),
        "widgets/badge.html",
        concat!(
            r#"<link href="{local}badge.css" rel="stylesheet">"#,
            r#"<script src="{local}/badge.js"></script>"#,
        ),
    );
    write(dir.path(), "pages/badge.css", "page{}");
    write(dir.path(), "pages/badge.js", "badge()");

    let task = BuildTask::new(
        [
            dir.path().join("pages/home.html"),
            dir.path().join("widgets/badge.html"),
        ],
        dir.path().join("out/home.html"),
    );
    Builder::new(Options::new(dir.path()))
        .build(&[task])
        .expect("build");

    let out = fs::read_to_string(dir.path().join("out/home.html")).unwrap();
    assert_eq!(out, "<main></main>\n<style>page{}</style><script>badge()</script>");
}
