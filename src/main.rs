//! Chat RAG Assistant configuration tool - entry point
//!
//! CLI-based entry point that dispatches to various commands.

use clap::Parser;

use chat_rag_config::{
    cli::{Cli, Commands},
    commands, logging, ConfigResult, SettingsProvider,
};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // The subscriber may not exist yet when settings fail to load
        eprintln!("error [{}]: {}", e.code(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> ConfigResult<()> {
    if let Commands::Env = cli.command {
        return commands::env::execute();
    }

    // Load configuration once and pass it down explicitly
    let provider = SettingsProvider::with_env_file(&cli.env_file);
    let resolved = provider.resolve()?;
    let settings = provider.build(&resolved)?;

    let _guard = logging::init(&settings, cli.verbose)?;
    tracing::debug!("Configuration loaded: {:?}", settings);

    let result = match cli.command {
        Commands::Check => commands::check::execute(&settings),
        Commands::Show(args) => commands::show::execute(args, &settings, &resolved),
        Commands::Env => commands::env::execute(),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }
    result
}
