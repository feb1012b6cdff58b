//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `check` - Validate configuration and prepare directories
//! - `show` - Print the resolved settings
//! - `env` - List recognized environment variables

pub mod args;

pub use args::{Cli, Commands};
