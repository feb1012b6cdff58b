//! Env command - Lists recognized environment variables.

use crate::config::{is_secret, ConfigSource, DefaultsSource, ALL_KEYS};
use crate::errors::ConfigResult;

/// Execute the env command
pub fn execute() -> ConfigResult<()> {
    for line in lines()? {
        println!("{}", line);
    }
    Ok(())
}

fn lines() -> ConfigResult<Vec<String>> {
    let defaults = DefaultsSource.collect()?;

    Ok(ALL_KEYS
        .iter()
        .map(|key| match defaults.get(*key) {
            Some(_) if is_secret(key) => format!("{}=<secret>", key),
            Some(value) => format!("{}={}", key, value),
            None => format!("{} (required)", key),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_keys_marked() {
        let lines = lines().unwrap();

        assert_eq!(lines.len(), ALL_KEYS.len());
        assert!(lines.contains(&"OPENAI_API_KEY (required)".to_string()));
        assert!(lines.contains(&"SECRET_KEY (required)".to_string()));
        assert!(lines.contains(&"PORT=8000".to_string()));
        assert!(lines.contains(&"DATABASE_URL=<secret>".to_string()));
    }
}
