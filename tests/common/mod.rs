//! Shared helpers for integration tests.

use std::env;
use std::path::{Path, PathBuf};

use chat_rag_config::config::ALL_KEYS;

/// Clears every recognized variable and restores the originals on drop.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn clean() -> Self {
        let saved = ALL_KEYS
            .iter()
            .map(|key| (key.to_string(), env::var(key).ok()))
            .collect();
        for key in ALL_KEYS {
            env::remove_var(key);
        }
        Self { saved }
    }

    pub fn set(&self, key: &str, value: impl AsRef<str>) {
        env::set_var(key, value.as_ref());
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Point the three managed directories below `root`.
pub fn set_dirs(guard: &EnvGuard, root: &Path) -> [PathBuf; 3] {
    let dirs = [
        root.join("uploads"),
        root.join("chroma_db"),
        root.join("logs"),
    ];
    guard.set("UPLOAD_DIR", dirs[0].to_string_lossy());
    guard.set("CHROMA_PERSIST_DIRECTORY", dirs[1].to_string_lossy());
    guard.set("ERROR_LOG_DIR", dirs[2].to_string_lossy());
    dirs
}

pub fn set_required(guard: &EnvGuard) {
    guard.set("OPENAI_API_KEY", "sk-test");
    guard.set("SECRET_KEY", "test-secret-key");
}
