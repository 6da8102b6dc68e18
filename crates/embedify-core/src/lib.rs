//! Embedify Core Library
//!
//! Core types, configuration, and error handling for the Embedify HTML inliner.

pub mod config;
pub mod engine;
pub mod error;
pub mod options;
pub mod task;

pub use config::Config;
pub use engine::Engine;
pub use error::{CoreError, Result};
pub use options::{
    ImageDecision, ImageHook, Options, ScriptRemap, StylesheetRemap, TagSetting, Tags,
};
pub use task::BuildTask;
