//! Configuration layers.
//!
//! Each source produces raw key/value pairs. Sources are queried in order and
//! later sources override earlier ones, so the standard stack is
//! defaults, then the env file, then the live environment.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use super::constants::*;
use crate::errors::{ConfigError, ConfigResult};

/// A value before type coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A single string, as every environment variable is
    Text(String),
    /// A native list, as supplied by defaults or in-memory sources
    List(Vec<String>),
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        RawValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawValue::List(values.into_iter().map(Into::into).collect())
    }

    /// True for whitespace-only text and empty lists
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::List(items) => items.is_empty(),
        }
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Text(s) => f.write_str(s),
            RawValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Raw values keyed by uppercased setting name
pub type RawValues = HashMap<String, RawValue>;

/// Environment variable names are matched case-insensitively.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}

fn is_known_key(key: &str) -> bool {
    ALL_KEYS.contains(&key)
}

/// One layer of configuration.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait ConfigSource: Send + Sync {
    /// Layer name, reported as the provenance of the values it supplies
    fn name(&self) -> &str;

    /// Read every recognized key this layer sets
    fn collect(&self) -> ConfigResult<RawValues>;
}

// =============================================================================
// Built-in defaults
// =============================================================================

/// Lowest layer. Required keys have no default and are absent here.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
    fn name(&self) -> &str {
        "defaults"
    }

    fn collect(&self) -> ConfigResult<RawValues> {
        let mut values = RawValues::new();
        let mut text = |key: &str, value: String| {
            values.insert(key.to_string(), RawValue::Text(value));
        };

        text(KEY_DATABASE_URL, DEFAULT_DATABASE_URL.to_string());
        text(KEY_LLM_MODEL, DEFAULT_LLM_MODEL.to_string());
        text(KEY_LLM_TEMPERATURE, DEFAULT_LLM_TEMPERATURE.to_string());
        text(KEY_LLM_MAX_TOKENS, DEFAULT_LLM_MAX_TOKENS.to_string());
        text(
            KEY_CHROMA_PERSIST_DIRECTORY,
            DEFAULT_CHROMA_PERSIST_DIRECTORY.to_string(),
        );
        text(KEY_EMBEDDING_MODEL, DEFAULT_EMBEDDING_MODEL.to_string());
        text(KEY_ALGORITHM, DEFAULT_ALGORITHM.to_string());
        text(
            KEY_ACCESS_TOKEN_EXPIRE_MINUTES,
            DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES.to_string(),
        );
        text(KEY_UPLOAD_DIR, DEFAULT_UPLOAD_DIR.to_string());
        text(KEY_MAX_FILE_SIZE, DEFAULT_MAX_FILE_SIZE.to_string());
        text(KEY_DEBUG, DEFAULT_DEBUG.to_string());
        text(KEY_LOG_LEVEL, DEFAULT_LOG_LEVEL.to_string());
        text(KEY_ERROR_LOGGING, DEFAULT_ERROR_LOGGING.to_string());
        text(KEY_ERROR_LOG_DIR, DEFAULT_ERROR_LOG_DIR.to_string());
        text(KEY_SENTRY_DSN, DEFAULT_SENTRY_DSN.to_string());
        text(KEY_API_V1_STR, DEFAULT_API_V1_STR.to_string());
        text(KEY_PROJECT_NAME, DEFAULT_PROJECT_NAME.to_string());
        text(KEY_PORT, DEFAULT_PORT.to_string());

        values.insert(
            KEY_ALLOWED_ORIGINS.to_string(),
            RawValue::list(DEFAULT_ALLOWED_ORIGINS.iter().copied()),
        );

        Ok(values)
    }
}

// =============================================================================
// Env file
// =============================================================================

/// `KEY=value` file, conventionally `.env` in the working directory.
///
/// A missing file is an empty layer. A malformed line fails the whole load.
#[derive(Debug, Clone)]
pub struct EnvFileSource {
    path: PathBuf,
}

impl EnvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for EnvFileSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_FILE)
    }
}

impl ConfigSource for EnvFileSource {
    fn name(&self) -> &str {
        "env file"
    }

    fn collect(&self) -> ConfigResult<RawValues> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(e) if e.not_found() => {
                tracing::debug!("No env file at {}", self.path.display());
                return Ok(RawValues::new());
            }
            Err(e) => return Err(ConfigError::env_file(&self.path, e.to_string())),
        };

        let mut values = RawValues::new();
        for item in iter {
            let (key, value) = item.map_err(|e| ConfigError::env_file(&self.path, e.to_string()))?;
            let key = normalize_key(&key);
            if is_known_key(&key) {
                values.insert(key, RawValue::Text(value));
            } else {
                tracing::debug!("Ignoring unrecognized key {} in env file", key);
            }
        }

        tracing::debug!(
            "Read {} setting(s) from {}",
            values.len(),
            self.path.display()
        );
        Ok(values)
    }
}

// =============================================================================
// Process environment
// =============================================================================

/// Live process environment. Highest precedence in the standard stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentSource;

impl ConfigSource for EnvironmentSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn collect(&self) -> ConfigResult<RawValues> {
        let mut values = RawValues::new();
        let mut folded = RawValues::new();

        for (name, value) in env::vars_os() {
            let Some(name) = name.to_str() else {
                continue;
            };
            let key = normalize_key(name);
            if !is_known_key(&key) {
                continue;
            }
            let value = match value.into_string() {
                Ok(value) => RawValue::Text(value),
                Err(_) => {
                    tracing::warn!("Skipping {}: value is not valid UTF-8", name);
                    continue;
                }
            };
            // `PORT` beats `port` when both are set
            if name == key {
                values.insert(key, value);
            } else {
                folded.entry(key).or_insert(value);
            }
        }

        for (key, value) in folded {
            values.entry(key).or_insert(value);
        }

        Ok(values)
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Fixed values, for tests and for embedding the loader in other tools.
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    values: RawValues,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: RawValues::new(),
        }
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(normalize_key(key), RawValue::text(value));
        self
    }

    pub fn set_list<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.insert(normalize_key(key), RawValue::list(values));
        self
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> ConfigResult<RawValues> {
        Ok(self.values.clone())
    }
}

// =============================================================================
// Merge
// =============================================================================

/// A raw value together with the layer that supplied it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: RawValue,
    pub source: String,
}

/// Merged view of every layer.
#[derive(Debug, Clone, Default)]
pub struct ResolvedValues {
    entries: HashMap<String, Resolved>,
}

impl ResolvedValues {
    /// Query sources in order. Later sources override earlier ones.
    pub fn merge(sources: &[Box<dyn ConfigSource>]) -> ConfigResult<Self> {
        let mut entries = HashMap::new();

        for source in sources {
            let values = source.collect()?;
            tracing::debug!("Layer '{}' supplied {} value(s)", source.name(), values.len());
            for (key, value) in values {
                entries.insert(
                    key,
                    Resolved {
                        value,
                        source: source.name().to_string(),
                    },
                );
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key).map(|r| &r.value)
    }

    /// Name of the layer that won for `key`
    pub fn source_of(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|r| r.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn boxed(source: impl ConfigSource + 'static) -> Box<dyn ConfigSource> {
        Box::new(source)
    }

    #[test]
    fn test_later_layer_wins() {
        let sources = vec![
            boxed(MapSource::new("first").set("PORT", "1").set("LLM_MODEL", "a")),
            boxed(MapSource::new("second").set("PORT", "2")),
        ];

        let resolved = ResolvedValues::merge(&sources).unwrap();

        assert_eq!(resolved.get("PORT"), Some(&RawValue::text("2")));
        assert_eq!(resolved.source_of("PORT"), Some("second"));
        assert_eq!(resolved.get("LLM_MODEL"), Some(&RawValue::text("a")));
        assert_eq!(resolved.source_of("LLM_MODEL"), Some("first"));
    }

    #[test]
    fn test_map_source_normalizes_keys() {
        let values = MapSource::new("m").set("port", "9000").collect().unwrap();
        assert_eq!(values.get("PORT"), Some(&RawValue::text("9000")));
    }

    #[test]
    fn test_defaults_omit_required_keys() {
        let values = DefaultsSource.collect().unwrap();

        assert!(!values.contains_key(KEY_OPENAI_API_KEY));
        assert!(!values.contains_key(KEY_SECRET_KEY));
        assert_eq!(values.len(), ALL_KEYS.len() - 2);
        assert_eq!(
            values.get(KEY_ALLOWED_ORIGINS),
            Some(&RawValue::list(DEFAULT_ALLOWED_ORIGINS.iter().copied()))
        );
    }

    #[test]
    fn test_missing_env_file_is_empty_layer() {
        let dir = tempfile::tempdir().unwrap();
        let source = EnvFileSource::new(dir.path().join("absent.env"));

        assert!(source.collect().unwrap().is_empty());
    }

    #[test]
    fn test_env_file_values_and_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "port=9000").unwrap();
        writeln!(file, "PROJECT_NAME=\"Quoted Name\"").unwrap();
        writeln!(file, "UNRELATED=1").unwrap();

        let values = EnvFileSource::new(file.path()).collect().unwrap();

        assert_eq!(values.get("PORT"), Some(&RawValue::text("9000")));
        assert_eq!(values.get("PROJECT_NAME"), Some(&RawValue::text("Quoted Name")));
        assert!(!values.contains_key("UNRELATED"));
    }

    #[test]
    fn test_malformed_env_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PORT=9000").unwrap();
        writeln!(file, "this line has no equals sign").unwrap();

        let err = EnvFileSource::new(file.path()).collect().unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[test]
    fn test_failing_layer_aborts_merge() {
        let mut broken = MockConfigSource::new();
        broken.expect_name().return_const("broken".to_string());
        broken
            .expect_collect()
            .returning(|| Err(ConfigError::env_file(".env", "line 3")));

        let sources = vec![boxed(DefaultsSource), boxed(broken)];
        assert!(ResolvedValues::merge(&sources).is_err());
    }

    #[test]
    fn test_blank_values() {
        assert!(RawValue::text("  ").is_blank());
        assert!(RawValue::List(vec![]).is_blank());
        assert!(!RawValue::text("x").is_blank());
    }
}
