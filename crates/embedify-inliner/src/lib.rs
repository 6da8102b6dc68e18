//! Embedify Inliner Library
//!
//! Turns HTML template fragments into self-contained documents by embedding
//! the stylesheets, scripts and images they reference.
//!
//! # Modules
//!
//! - [`fs`] - File system capability used for every read and write
//! - [`partial`] - `{global}` / `{local}` path resolution for partial fragments
//! - [`matcher`] - Narrow tag patterns and the replacement driver
//! - [`script`] - `<script src>` inlining
//! - [`image`] - `<img src>` data URIs and sprite atlas reduction
//! - [`permutation`] - Engine-specific stylesheet permutations
//! - [`style`] - `<link rel="stylesheet">` inlining for the default build
//! - [`build`] - Task orchestration

pub mod build;
pub mod error;
pub mod fs;
pub mod image;
pub mod matcher;
pub mod partial;
pub mod permutation;
pub mod script;
pub mod style;

pub use build::{BuildStats, Builder, ResolvedReference, TaskReport, TaskScan};
pub use error::{InlineError, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use matcher::{Inlined, Reference, ReferenceKind, scan_references};
pub use partial::PartialContext;
pub use permutation::RenderedDocument;
