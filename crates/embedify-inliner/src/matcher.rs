//! Tag matchers.
//!
//! Each matcher is a narrow text pattern over raw markup, not an HTML parser.
//! Tags that don't fit the expected shape (unquoted attributes, unusual
//! ordering) pass through untouched. References containing `//` point at
//! remote resources and are never handed to a replacement callback.

use std::{convert::Infallible, sync::LazyLock};

use regex::{Captures, Regex};

/// `<link href=".." rel="stylesheet">`
static STYLESHEET_HREF_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<link[^>]+href=["'])([^"']+)(["'][^>]*rel=["']stylesheet["'][^>]*>)"#)
        .expect("valid stylesheet pattern")
});

/// `<link rel="stylesheet" href="..">`
static STYLESHEET_REL_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<link[^>]*rel=["']stylesheet["'][^>]*href=["'])([^"']+)(["'][^>]*>)"#)
        .expect("valid stylesheet pattern")
});

/// `<script src=".."></script>` with no inline body.
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<script[^>]+src=["'])([^"']+)(["'][^>]*></script>)"#)
        .expect("valid script pattern")
});

/// `<img src="..">`
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<img[^>]+src=["'])([^"']+)(["'][^>]*>)"#).expect("valid image pattern")
});

/// `<img spritemap="..">`. The quotes are captured separately so the
/// replacement can choose its own.
static SPRITEMAP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(<img[^>]+spritemap=)["']([^"']+)["']([^>]*>)"#)
        .expect("valid spritemap pattern")
});

/// The kind of resource a tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Stylesheet,
    Script,
    Image,
    SpriteAtlas,
}

impl ReferenceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::Image => "image",
            Self::SpriteAtlas => "spriteatlas",
        }
    }
}

/// A reference found by one matching pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,

    /// The path exactly as written in the markup.
    pub path: String,

    /// The whole matched tag.
    pub tag: String,
}

/// One matched tag, split around its reference path.
#[derive(Debug, Clone, Copy)]
pub struct TagMatch<'a> {
    /// The whole matched text.
    pub full: &'a str,

    /// Everything before the path.
    pub prefix: &'a str,

    /// The referenced path.
    pub path: &'a str,

    /// Everything after the path.
    pub suffix: &'a str,
}

impl<'a> TagMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        Some(Self {
            full: caps.get(0)?.as_str(),
            prefix: caps.get(1)?.as_str(),
            path: caps.get(2)?.as_str(),
            suffix: caps.get(3)?.as_str(),
        })
    }

    /// Rebuild the tag around a different reference value.
    #[must_use]
    pub fn with_path(&self, path: &str) -> String {
        format!("{}{path}{}", self.prefix, self.suffix)
    }
}

/// Markup produced by an inlining pass plus the files it embedded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inlined {
    pub markup: String,
    pub files: Vec<String>,
}

/// Whether a reference points at a remote resource.
#[must_use]
pub fn is_remote(path: &str) -> bool {
    path.contains("//")
}

/// Run `re` over `text`, substituting each non-remote match with the
/// callback's output. The first callback error aborts the pass.
fn try_replace_all<E>(
    re: &Regex,
    text: &str,
    replace: &mut impl FnMut(&TagMatch<'_>) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in re.captures_iter(text) {
        let Some(m) = TagMatch::from_captures(&caps) else {
            continue;
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        out.push_str(&text[last..whole.start()]);
        if is_remote(m.path) {
            out.push_str(m.full);
        } else {
            out.push_str(&replace(&m)?);
        }
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

/// Replace stylesheet links, covering both `href`/`rel` orders.
///
/// The two orders are separate passes sharing one callback. A tag replaced
/// by the first pass no longer looks like a link to the second.
pub fn replace_stylesheets<E>(
    markup: &str,
    mut replace: impl FnMut(&TagMatch<'_>) -> Result<String, E>,
) -> Result<String, E> {
    let markup = try_replace_all(&STYLESHEET_HREF_FIRST, markup, &mut replace)?;
    try_replace_all(&STYLESHEET_REL_FIRST, &markup, &mut replace)
}

/// Replace `<script src="..."></script>` tags.
pub fn replace_scripts<E>(
    markup: &str,
    mut replace: impl FnMut(&TagMatch<'_>) -> Result<String, E>,
) -> Result<String, E> {
    try_replace_all(&SCRIPT, markup, &mut replace)
}

/// Replace `src` references of `<img>` tags.
pub fn replace_images<E>(
    markup: &str,
    mut replace: impl FnMut(&TagMatch<'_>) -> Result<String, E>,
) -> Result<String, E> {
    try_replace_all(&IMAGE, markup, &mut replace)
}

/// Replace `spritemap` references of `<img>` tags.
///
/// The prefix ends at `spritemap=` and the suffix starts after the closing
/// quote, so the callback supplies the quotes.
pub fn replace_spritemaps<E>(
    markup: &str,
    mut replace: impl FnMut(&TagMatch<'_>) -> Result<String, E>,
) -> Result<String, E> {
    try_replace_all(&SPRITEMAP, markup, &mut replace)
}

/// Every non-remote reference in `markup`, grouped by kind in pass order.
#[must_use]
pub fn scan_references(markup: &str) -> Vec<Reference> {
    let mut references = Vec::new();

    let passes: [(ReferenceKind, &LazyLock<Regex>); 5] = [
        (ReferenceKind::Stylesheet, &STYLESHEET_HREF_FIRST),
        (ReferenceKind::Stylesheet, &STYLESHEET_REL_FIRST),
        (ReferenceKind::Script, &SCRIPT),
        (ReferenceKind::Image, &IMAGE),
        (ReferenceKind::SpriteAtlas, &SPRITEMAP),
    ];

    for (kind, re) in passes {
        let mut collect = |m: &TagMatch<'_>| -> Result<String, Infallible> {
            references.push(Reference {
                kind,
                path: m.path.to_string(),
                tag: m.full.to_string(),
            });
            Ok(m.full.to_string())
        };
        let Ok(_) = try_replace_all(re, markup, &mut collect);
    }

    references
}
