//! Integration tests for startup configuration
//!
//! Required values must fail fast when missing or malformed; there are no
//! fallback defaults for safety-relevant settings.

use serial_test::serial;
use std::env;
use streamrag_core::config::AppConfig;
use streamrag_core::error::StreamragError;

const REQUIRED: &[(&str, &str)] = &[
    ("STREAMRAG_EMBED_MODEL", "all-minilm"),
    ("STREAMRAG_EMBED_DIM", "384"),
    ("STREAMRAG_CONTEXT_THRESHOLD", "0.5"),
    ("STREAMRAG_GENERATOR_MODEL", "gemma3"),
    ("STREAMRAG_TEMPERATURE", "0.2"),
    ("STREAMRAG_NUM_CTX", "4096"),
    ("STREAMRAG_NUM_PREDICT", "512"),
];

const OPTIONAL: &[&str] = &[
    "DATABASE_URL",
    "STREAMRAG_TABLE",
    "STREAMRAG_TEMPLATE_DIR",
    "STREAMRAG_OLLAMA_URL",
];

fn set_required_env() {
    for (key, value) in REQUIRED {
        env::set_var(key, value);
    }
}

fn clear_env() {
    for (key, _) in REQUIRED {
        env::remove_var(key);
    }
    for key in OPTIONAL {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn loads_complete_configuration() {
    clear_env();
    set_required_env();
    env::set_var("DATABASE_URL", "postgres://localhost/streamrag");
    env::set_var("STREAMRAG_TABLE", "demo_chunks");

    let config = AppConfig::from_env().unwrap();

    assert_eq!(config.embed_model, "all-minilm");
    assert_eq!(config.embed_dim, 384);
    assert_eq!(config.table, "demo_chunks");
    assert_eq!(config.context_threshold, 0.5);
    assert_eq!(config.generator_model, "gemma3");
    assert_eq!(config.generation.temperature, 0.2);
    assert_eq!(config.generation.context_window, 4096);
    assert_eq!(config.generation.max_output_tokens, 512);
    assert!(config.uses_postgres());
}

#[test]
#[serial]
fn defaults_apply_only_to_optional_values() {
    clear_env();
    set_required_env();

    let config = AppConfig::from_env().unwrap();

    assert!(!config.uses_postgres());
    assert_eq!(config.table, "passages");
    assert_eq!(config.ollama_url, "http://localhost:11434");
    assert_eq!(config.template_dir.to_str().unwrap(), "templates");
}

#[test]
#[serial]
fn missing_threshold_is_a_configuration_error() {
    clear_env();
    set_required_env();
    env::remove_var("STREAMRAG_CONTEXT_THRESHOLD");

    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(
        err,
        StreamragError::ConfigMissing { ref key } if key == "STREAMRAG_CONTEXT_THRESHOLD"
    ));
}

#[test]
#[serial]
fn malformed_dimension_is_rejected() {
    clear_env();
    set_required_env();
    env::set_var("STREAMRAG_EMBED_DIM", "many");

    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(
        err,
        StreamragError::ConfigInvalid { ref key, .. } if key == "STREAMRAG_EMBED_DIM"
    ));
}

#[test]
#[serial]
fn zero_dimension_is_rejected() {
    clear_env();
    set_required_env();
    env::set_var("STREAMRAG_EMBED_DIM", "0");

    assert!(AppConfig::from_env().is_err());
}

#[test]
#[serial]
fn missing_generation_options_fail_fast() {
    clear_env();
    set_required_env();
    env::remove_var("STREAMRAG_NUM_PREDICT");

    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(
        err,
        StreamragError::ConfigMissing { ref key } if key == "STREAMRAG_NUM_PREDICT"
    ));
}
