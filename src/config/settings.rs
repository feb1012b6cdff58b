//! Application settings record.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::coerce;
use super::constants::*;
use super::source::ResolvedValues;
use crate::errors::{ConfigError, ConfigResult};

/// Where ERROR-level events are written besides the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLogging {
    /// `errors.log` inside the error log directory (mode 1)
    File,
    /// Remote error tracker at `SENTRY_DSN` (mode 2)
    Remote,
    /// Any other mode
    Disabled,
}

impl ErrorLogging {
    pub fn from_mode(mode: i64) -> Self {
        match mode {
            1 => ErrorLogging::File,
            2 => ErrorLogging::Remote,
            _ => ErrorLogging::Disabled,
        }
    }
}

/// Application settings
///
/// Built once at startup and read-only afterwards.
#[derive(Clone, Serialize)]
pub struct Settings {
    // Database
    pub database_url: String,

    // LLM
    #[serde(skip_serializing)]
    openai_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f64,
    pub llm_max_tokens: u32,

    // Vector store
    pub chroma_persist_directory: PathBuf,
    pub embedding_model: String,

    // Security
    #[serde(skip_serializing)]
    secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,

    // File storage
    pub upload_dir: PathBuf,
    pub max_file_size: u64,

    // CORS
    pub allowed_origins: Vec<String>,

    // Development
    pub debug: bool,
    pub log_level: String,

    // Error logging
    pub error_logging: ErrorLogging,
    pub error_log_dir: PathBuf,
    pub sentry_dsn: String,

    // API
    pub api_v1_str: String,
    pub project_name: String,
    pub port: u16,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &"[REDACTED]")
            .field("openai_api_key", &"[REDACTED]")
            .field("llm_model", &self.llm_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("chroma_persist_directory", &self.chroma_persist_directory)
            .field("embedding_model", &self.embedding_model)
            .field("secret_key", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("upload_dir", &self.upload_dir)
            .field("max_file_size", &self.max_file_size)
            .field("allowed_origins", &self.allowed_origins)
            .field("debug", &self.debug)
            .field("log_level", &self.log_level)
            .field("error_logging", &self.error_logging)
            .field("error_log_dir", &self.error_log_dir)
            .field("sentry_dsn", &"[REDACTED]")
            .field("api_v1_str", &self.api_v1_str)
            .field("project_name", &self.project_name)
            .field("port", &self.port)
            .finish()
    }
}

/// Typed lookups over the merged layers.
struct Fields<'a> {
    values: &'a ResolvedValues,
}

impl<'a> Fields<'a> {
    fn raw(&self, key: &str) -> ConfigResult<&'a super::source::RawValue> {
        self.values.get(key).ok_or_else(|| ConfigError::missing(key))
    }

    /// Required keys must resolve to a non-blank value.
    fn required(&self, key: &str) -> ConfigResult<String> {
        let raw = self.raw(key)?;
        if raw.is_blank() {
            return Err(ConfigError::missing(key));
        }
        coerce::string(key, raw)
    }

    fn string(&self, key: &str) -> ConfigResult<String> {
        coerce::string(key, self.raw(key)?)
    }

    fn path(&self, key: &str) -> ConfigResult<PathBuf> {
        coerce::path(key, self.raw(key)?)
    }

    fn number<T>(&self, key: &str) -> ConfigResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        coerce::number(key, self.raw(key)?)
    }

    fn boolean(&self, key: &str) -> ConfigResult<bool> {
        coerce::boolean(key, self.raw(key)?)
    }

    fn list(&self, key: &str) -> ConfigResult<Vec<String>> {
        coerce::list(key, self.raw(key)?)
    }
}

impl Settings {
    /// Coerce merged layer values into a settings record.
    ///
    /// Pure: performs no filesystem access. Keys without a value in any layer
    /// fail with [`ConfigError::MissingRequired`].
    pub fn from_values(values: &ResolvedValues) -> ConfigResult<Self> {
        let f = Fields { values };

        Ok(Self {
            database_url: f.string(KEY_DATABASE_URL)?,
            openai_api_key: f.required(KEY_OPENAI_API_KEY)?,
            llm_model: f.string(KEY_LLM_MODEL)?,
            llm_temperature: f.number(KEY_LLM_TEMPERATURE)?,
            llm_max_tokens: f.number(KEY_LLM_MAX_TOKENS)?,
            chroma_persist_directory: f.path(KEY_CHROMA_PERSIST_DIRECTORY)?,
            embedding_model: f.string(KEY_EMBEDDING_MODEL)?,
            secret_key: f.required(KEY_SECRET_KEY)?,
            algorithm: f.string(KEY_ALGORITHM)?,
            access_token_expire_minutes: f.number(KEY_ACCESS_TOKEN_EXPIRE_MINUTES)?,
            upload_dir: f.path(KEY_UPLOAD_DIR)?,
            max_file_size: f.number(KEY_MAX_FILE_SIZE)?,
            allowed_origins: f.list(KEY_ALLOWED_ORIGINS)?,
            debug: f.boolean(KEY_DEBUG)?,
            log_level: f.string(KEY_LOG_LEVEL)?,
            error_logging: ErrorLogging::from_mode(f.number(KEY_ERROR_LOGGING)?),
            error_log_dir: f.path(KEY_ERROR_LOG_DIR)?,
            sentry_dsn: f.string(KEY_SENTRY_DSN)?,
            api_v1_str: f.string(KEY_API_V1_STR)?,
            project_name: f.string(KEY_PROJECT_NAME)?,
            port: f.number(KEY_PORT)?,
        })
    }

    /// Get the LLM provider API key.
    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }

    /// Get secret key bytes for token signing/verification.
    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// Parse the configured signing algorithm.
    pub fn signing_algorithm(&self) -> ConfigResult<jsonwebtoken::Algorithm> {
        self.algorithm.parse().map_err(|e: jsonwebtoken::errors::Error| {
            ConfigError::invalid(KEY_ALGORITHM, &self.algorithm, e.to_string())
        })
    }

    /// Access token lifetime, saturating for out-of-range minute counts.
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.access_token_expire_minutes)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", DEFAULT_SERVER_HOST, self.port)
    }

    /// Prefix a route with the API version path, e.g. `/health` becomes
    /// `/api/v1/health`.
    pub fn api_path(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.api_v1_str.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    /// Upload limit in whole megabytes
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / BYTES_PER_MEGABYTE
    }

    pub fn accepts_upload(&self, size: u64) -> bool {
        size <= self.max_file_size
    }

    /// Deployment environment name reported to the error tracker
    pub fn environment(&self) -> &'static str {
        if self.debug {
            "development"
        } else {
            "production"
        }
    }

    /// Directories that must exist before the application starts, with the
    /// key each one came from.
    pub fn directories(&self) -> [(&'static str, &Path); 3] {
        [
            (KEY_UPLOAD_DIR, self.upload_dir.as_path()),
            (
                KEY_CHROMA_PERSIST_DIRECTORY,
                self.chroma_persist_directory.as_path(),
            ),
            (KEY_ERROR_LOG_DIR, self.error_log_dir.as_path()),
        ]
    }

    /// Path of the local error log file
    pub fn error_log_file(&self) -> PathBuf {
        self.error_log_dir.join(ERROR_LOG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::{ConfigSource, DefaultsSource, MapSource};

    fn resolve(overrides: MapSource) -> ResolvedValues {
        let sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(DefaultsSource), Box::new(overrides)];
        ResolvedValues::merge(&sources).unwrap()
    }

    fn required() -> MapSource {
        MapSource::new("test")
            .set(KEY_OPENAI_API_KEY, "sk-test")
            .set(KEY_SECRET_KEY, "test-secret")
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_values(&resolve(required())).unwrap();

        assert_eq!(settings.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(settings.llm_temperature, 0.7);
        assert_eq!(settings.llm_max_tokens, 1000);
        assert_eq!(settings.max_file_size, 5_242_880);
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.allowed_origins.len(), 4);
        assert!(settings.debug);
        assert_eq!(settings.error_logging, ErrorLogging::File);
        assert_eq!(settings.sentry_dsn, "");
        assert_eq!(settings.openai_api_key(), "sk-test");
        assert_eq!(settings.secret_key_bytes(), b"test-secret");
    }

    #[test]
    fn test_missing_secret_key() {
        let values = resolve(MapSource::new("test").set(KEY_OPENAI_API_KEY, "sk-test"));
        let err = Settings::from_values(&values).unwrap_err();

        assert_eq!(err.key(), Some(KEY_SECRET_KEY));
        assert_eq!(err.code(), "MISSING_REQUIRED");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let values = resolve(required().set(KEY_OPENAI_API_KEY, "   "));
        let err = Settings::from_values(&values).unwrap_err();

        assert_eq!(err.key(), Some(KEY_OPENAI_API_KEY));
    }

    #[test]
    fn test_error_logging_modes() {
        let remote = resolve(required().set(KEY_ERROR_LOGGING, "2"));
        let off = resolve(required().set(KEY_ERROR_LOGGING, "0"));
        let bad = resolve(required().set(KEY_ERROR_LOGGING, "file"));

        assert_eq!(
            Settings::from_values(&remote).unwrap().error_logging,
            ErrorLogging::Remote
        );
        assert_eq!(
            Settings::from_values(&off).unwrap().error_logging,
            ErrorLogging::Disabled
        );
        assert!(Settings::from_values(&bad).is_err());
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let settings = Settings::from_values(&resolve(required())).unwrap();
        let output = format!("{:?}", settings);

        assert!(!output.contains("sk-test"));
        assert!(!output.contains("test-secret"));
        assert!(!output.contains("username:password"));
    }

    #[test]
    fn test_serialized_output_skips_secrets() {
        let settings = Settings::from_values(&resolve(required())).unwrap();
        let json = serde_json::to_value(&settings).unwrap();

        assert!(json.get("openai_api_key").is_none());
        assert!(json.get("secret_key").is_none());
        assert_eq!(json["error_logging"], "file");
        assert_eq!(json["port"], 8000);
    }

    #[test]
    fn test_helpers() {
        let settings = Settings::from_values(&resolve(required())).unwrap();

        assert_eq!(settings.server_addr(), "0.0.0.0:8000");
        assert_eq!(settings.api_path("/health"), "/api/v1/health");
        assert_eq!(settings.api_path("chat"), "/api/v1/chat");
        assert_eq!(settings.max_file_size_mb(), 5);
        assert!(settings.accepts_upload(5_242_880));
        assert!(!settings.accepts_upload(5_242_881));
        assert_eq!(settings.environment(), "development");
        assert_eq!(settings.access_token_ttl(), chrono::Duration::minutes(30));
        assert_eq!(
            settings.signing_algorithm().unwrap(),
            jsonwebtoken::Algorithm::HS256
        );
        assert_eq!(
            settings.error_log_file(),
            PathBuf::from("./logs").join("errors.log")
        );
    }

    #[test]
    fn test_unknown_algorithm() {
        let values = resolve(required().set(KEY_ALGORITHM, "HS999"));
        let settings = Settings::from_values(&values).unwrap();

        assert!(settings.signing_algorithm().is_err());
    }
}
