//! Settings construction and the process-wide instance.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::constants::DEFAULT_ENV_FILE;
use super::settings::Settings;
use super::source::{
    ConfigSource, DefaultsSource, EnvFileSource, EnvironmentSource, ResolvedValues,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::infra::{Filesystem, StdFilesystem};

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Builds [`Settings`] from an ordered list of configuration layers.
pub struct SettingsProvider {
    sources: Vec<Box<dyn ConfigSource>>,
    filesystem: Arc<dyn Filesystem>,
}

impl SettingsProvider {
    /// Standard layers: defaults, `.env` in the working directory, then the
    /// live environment.
    pub fn new() -> Self {
        Self::with_env_file(DEFAULT_ENV_FILE)
    }

    /// Standard layers with a custom env file path.
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self::from_sources(vec![
            Box::new(DefaultsSource),
            Box::new(EnvFileSource::new(path)),
            Box::new(EnvironmentSource),
        ])
    }

    /// Explicit layers, lowest precedence first.
    pub fn from_sources(sources: Vec<Box<dyn ConfigSource>>) -> Self {
        Self {
            sources,
            filesystem: Arc::new(StdFilesystem),
        }
    }

    /// Substitute the filesystem used for directory creation.
    pub fn with_filesystem(mut self, filesystem: impl Filesystem + 'static) -> Self {
        self.filesystem = Arc::new(filesystem);
        self
    }

    /// Merge every layer without coercing.
    pub fn resolve(&self) -> ConfigResult<ResolvedValues> {
        ResolvedValues::merge(&self.sources)
    }

    /// Build the settings record.
    ///
    /// Every field is coerced before any directory is created, so a bad value
    /// never leaves a partial filesystem mutation behind.
    pub fn load(&self) -> ConfigResult<Settings> {
        let values = self.resolve()?;
        self.build(&values)
    }

    /// Build the settings record from values already merged by
    /// [`resolve`](Self::resolve).
    pub fn build(&self, values: &ResolvedValues) -> ConfigResult<Settings> {
        let settings = Settings::from_values(values)?;
        self.ensure_directories(&settings)?;

        tracing::debug!("Settings loaded for {}", settings.project_name);
        Ok(settings)
    }

    /// Create the upload, vector store and error log directories.
    pub fn ensure_directories(&self, settings: &Settings) -> ConfigResult<()> {
        for (key, path) in settings.directories() {
            self.filesystem
                .ensure_dir(path)
                .map_err(|e| ConfigError::directory(key, path, e))?;
            tracing::debug!("Directory ready for {}: {}", key, path.display());
        }
        Ok(())
    }
}

impl Default for SettingsProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the process-wide settings, loading them with the standard layers on
/// first call.
///
/// A failed load is not cached; later calls try again and report the error.
pub fn get() -> ConfigResult<&'static Settings> {
    SETTINGS.get_or_try_init(|| SettingsProvider::new().load())
}
