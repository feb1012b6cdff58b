//! Chat RAG Assistant configuration
//!
//! Typed settings for the Chat RAG Assistant backend, resolved from layered
//! sources and frozen for the lifetime of the process.
//!
//! # Layers
//!
//! From lowest to highest precedence:
//!
//! - **defaults**: built-in values (the API key and secret key have none)
//! - **env file**: `KEY=value` lines from `.env` in the working directory
//! - **environment**: live process environment variables
//!
//! # Modules
//!
//! - **config**: Settings record, layers, coercion and the provider
//! - **infra**: Filesystem operations for directory side effects
//! - **logging**: Tracing and error logging setup driven by settings
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **errors**: Centralized error handling
//!
//! # Usage
//!
//! ```no_run
//! use chat_rag_config::SettingsProvider;
//!
//! let settings = SettingsProvider::new().load()?;
//! println!("listening on {}", settings.server_addr());
//! # Ok::<(), chat_rag_config::ConfigError>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod logging;

// Re-export commonly used types at crate root
pub use config::{ErrorLogging, Settings, SettingsProvider};
pub use errors::{ConfigError, ConfigResult};
