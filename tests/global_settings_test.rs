//! Process-wide settings instance.
//!
//! Lives in its own test binary: the instance is built once per process.

use std::env;

use chat_rag_config::config;

#[test]
fn test_get_returns_same_instance() {
    let tmp = tempfile::tempdir().unwrap();
    env::set_var("OPENAI_API_KEY", "sk-global");
    env::set_var("SECRET_KEY", "global-secret");
    env::set_var("UPLOAD_DIR", tmp.path().join("uploads"));
    env::set_var("CHROMA_PERSIST_DIRECTORY", tmp.path().join("chroma_db"));
    env::set_var("ERROR_LOG_DIR", tmp.path().join("logs"));

    let first = config::get().unwrap();
    let second = config::get().unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(first.openai_api_key(), "sk-global");
    assert!(tmp.path().join("uploads").is_dir());
}
