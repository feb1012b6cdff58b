//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_ENV_FILE;

/// Chat RAG Assistant configuration tool
#[derive(Parser, Debug)]
#[command(name = "chat-rag-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Env file layered below the live environment
    #[arg(short, long, global = true, env = "ENV_FILE", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load settings, create directories and report problems
    Check,

    /// Print the resolved settings with secrets redacted
    Show(ShowArgs),

    /// List recognized environment variables and their defaults
    Env,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,

    /// Also print which layer supplied each value
    #[arg(long)]
    pub sources: bool,
}
