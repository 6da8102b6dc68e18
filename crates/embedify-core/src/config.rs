//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    options::{Options, Tags},
    task::BuildTask,
};

/// Main configuration structure for Embedify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Inlining options shared by all tasks.
    #[serde(default)]
    pub options: OptionsConfig,

    /// Output documents to build, in order.
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,
}

/// Inlining options as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for referenced files.
    #[serde(default = "default_relative_to")]
    pub relative_to: String,

    /// Which tag kinds are inlined.
    #[serde(default)]
    pub tags: TagsConfig,

    /// Reference paths that are left untouched.
    #[serde(default)]
    pub files_ignore: Vec<String>,
}

/// Per-kind switches. Remap functions are only available through the library API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    #[serde(default = "default_true")]
    pub stylesheet: bool,

    #[serde(default = "default_true")]
    pub script: bool,

    #[serde(default = "default_true")]
    pub img: bool,
}

/// One output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Source fragments, concatenated in order.
    pub src: Vec<String>,

    /// Destination of the default document.
    pub dest: String,
}

fn default_relative_to() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            relative_to: default_relative_to(),
            tags: TagsConfig::default(),
            files_ignore: Vec::new(),
        }
    }
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            stylesheet: true,
            script: true,
            img: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, letting `EMBEDIFY__*` environment variables override file values.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("EMBEDIFY").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(CoreError::config("at least one [[task]] is required"));
        }

        for task in &self.tasks {
            if task.dest.trim().is_empty() {
                return Err(CoreError::config("task.dest cannot be empty"));
            }
            if task.src.is_empty() {
                return Err(CoreError::task(&task.dest, "task.src cannot be empty"));
            }
            if task.src.iter().any(|src| src == &task.dest) {
                return Err(CoreError::task(
                    &task.dest,
                    "destination is also listed as a source",
                ));
            }
        }

        if self.options.relative_to.trim().is_empty() {
            tracing::warn!("options.relative_to is empty, using the config directory");
        }

        Ok(())
    }

    /// Directory that relative paths in the file at `path` are anchored to.
    #[must_use]
    pub fn base_dir(path: &Path) -> PathBuf {
        path.parent().map(Path::to_path_buf).unwrap_or_default()
    }

    /// Runtime options, with `relative_to` anchored at `base`.
    #[must_use]
    pub fn options(&self, base: &Path) -> Options {
        let tags = Tags {
            stylesheet: self.options.tags.stylesheet.into(),
            script: self.options.tags.script.into(),
            img: self.options.tags.img.into(),
        };

        Options::new(anchor(base, &self.options.relative_to))
            .with_tags(tags)
            .with_ignored(self.options.files_ignore.iter().cloned())
    }

    /// Build tasks, with every path anchored at `base`.
    #[must_use]
    pub fn tasks(&self, base: &Path) -> Vec<BuildTask> {
        self.tasks
            .iter()
            .map(|task| {
                BuildTask::new(
                    task.src.iter().map(|src| anchor(base, src)),
                    anchor(base, &task.dest),
                )
            })
            .collect()
    }
}

fn anchor(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else if path == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}
