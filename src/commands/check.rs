//! Check command - Validates configuration.

use crate::config::Settings;
use crate::errors::ConfigResult;

/// Execute the check command
///
/// Settings are already loaded (and directories created) by the caller, so
/// only the checks that are not part of loading run here.
pub fn execute(settings: &Settings) -> ConfigResult<()> {
    let algorithm = settings.signing_algorithm()?;

    for (key, path) in settings.directories() {
        tracing::info!("{}: {}", key, path.display());
    }
    tracing::info!("Allowed origins: {:?}", settings.allowed_origins);

    println!("{}", summary(settings, algorithm));
    Ok(())
}

fn summary(settings: &Settings, algorithm: jsonwebtoken::Algorithm) -> String {
    format!(
        "OK: {} on {} ({} mode), {:?} tokens valid {} min, {} CORS origin(s), error logging: {:?}",
        settings.project_name,
        settings.server_addr(),
        settings.environment(),
        algorithm,
        settings.access_token_expire_minutes,
        settings.allowed_origins.len(),
        settings.error_logging,
    )
}
