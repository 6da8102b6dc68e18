//! Embedify CLI Library
//!
//! This library provides the command implementations for the Embedify CLI.
//! It is used by the binary entry point while also exposing public APIs for
//! documentation and integration purposes.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check, watch)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use embedify::cmd;
//!
//! // Inline every task listed in embedify.toml
//! cmd::build::run(Path::new("embedify.toml"), None).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use embedify_core::{BuildTask, Config, Options};
pub use embedify_inliner::{BuildStats, Builder, TaskReport};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// embedify::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
