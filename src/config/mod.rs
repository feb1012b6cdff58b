//! Application configuration module
//!
//! Layered settings: built-in defaults, then the `.env` file, then the live
//! environment.

pub mod coerce;
mod constants;
pub mod provider;
mod settings;
pub mod source;

pub use constants::*;
pub use provider::{get, SettingsProvider};
pub use settings::{ErrorLogging, Settings};
pub use source::{
    ConfigSource, DefaultsSource, EnvFileSource, EnvironmentSource, MapSource, RawValue,
    RawValues, Resolved, ResolvedValues,
};

#[cfg(any(test, feature = "test-utils"))]
pub use source::MockConfigSource;
