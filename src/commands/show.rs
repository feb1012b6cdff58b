//! Show command - Prints the resolved settings.

use serde_json::{Map, Value};

use crate::cli::args::ShowArgs;
use crate::config::{is_secret, ResolvedValues, Settings, ALL_KEYS};
use crate::errors::{ConfigError, ConfigResult};

const REDACTED: &str = "[REDACTED]";

/// Execute the show command
pub fn execute(args: ShowArgs, settings: &Settings, resolved: &ResolvedValues) -> ConfigResult<()> {
    let view = redacted_view(settings)?;

    if args.json {
        let mut output = Map::new();
        output.insert("settings".to_string(), Value::Object(view));
        if args.sources {
            output.insert("sources".to_string(), Value::Object(sources_view(resolved)));
        }
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| ConfigError::output(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    for key in ALL_KEYS {
        let field = key.to_ascii_lowercase();
        let value = view.get(&field).map(render).unwrap_or_default();
        match resolved.source_of(key) {
            Some(source) if args.sources => println!("{:<28} {}  ({})", key, value, source),
            _ => println!("{:<28} {}", key, value),
        }
    }
    Ok(())
}

/// Settings as a JSON object keyed by field name, with every secret
/// replaced.
pub fn redacted_view(settings: &Settings) -> ConfigResult<Map<String, Value>> {
    let mut view = match serde_json::to_value(settings) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => return Err(ConfigError::output(e.to_string())),
    };

    for key in ALL_KEYS.iter().filter(|key| is_secret(key)) {
        view.insert(key.to_ascii_lowercase(), Value::String(REDACTED.to_string()));
    }
    Ok(view)
}

fn sources_view(resolved: &ResolvedValues) -> Map<String, Value> {
    ALL_KEYS
        .iter()
        .filter_map(|key| {
            resolved
                .source_of(key)
                .map(|source| (key.to_string(), Value::String(source.to_string())))
        })
        .collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultsSource, MapSource, SettingsProvider};
    use crate::infra::NoopFilesystem;

    #[test]
    fn test_redacted_view_hides_every_secret() {
        let settings = SettingsProvider::from_sources(vec![
            Box::new(DefaultsSource),
            Box::new(
                MapSource::new("test")
                    .set("OPENAI_API_KEY", "sk-test")
                    .set("SECRET_KEY", "test-secret")
                    .set("SENTRY_DSN", "https://key@o0.ingest.example.com/1"),
            ),
        ])
        .with_filesystem(NoopFilesystem)
        .load()
        .unwrap();

        let view = redacted_view(&settings).unwrap();
        let text = Value::Object(view.clone()).to_string();

        assert_eq!(view.len(), ALL_KEYS.len());
        assert_eq!(view["secret_key"], REDACTED);
        assert_eq!(view["database_url"], REDACTED);
        assert!(!text.contains("sk-test"));
        assert!(!text.contains("ingest.example.com"));
        assert_eq!(view["port"], 8000);
    }
}
