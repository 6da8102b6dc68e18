//! Command implementations.

pub mod build;
pub mod check;
pub mod watch;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use embedify_core::{BuildTask, Config, Options};

/// Load the configuration and turn it into runtime options and tasks.
///
/// `relative_to` overrides the configured base directory.
pub(crate) fn load(
    config_path: &Path,
    relative_to: Option<&Path>,
) -> Result<(Options, Vec<BuildTask>)> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    let base = Config::base_dir(config_path);

    let mut options = config.options(&base);
    if let Some(dir) = relative_to {
        tracing::info!(relative_to = %dir.display(), "Overriding relative_to from CLI");
        options.relative_to = dir.to_path_buf();
    }

    tracing::debug!(?options, "Loaded configuration");
    Ok((options, config.tasks(&base)))
}
