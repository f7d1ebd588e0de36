//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, value persistence, and reset behavior.

use seoforge::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use seoforge::types::content::Tone;
use seoforge::types::settings::AppSettings;
use serde_json::json;
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, AppSettings::default());
}

#[test]
fn test_set_value_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine.set_value("generation.tone", json!("persuasive")).unwrap();
    engine
        .set_value("generation.default_outline", json!(["Intro", "Pricing"]))
        .unwrap();

    let mut reloaded = engine_in_temp(&dir);
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.generation.tone, Tone::Persuasive);
    assert_eq!(settings.generation.default_outline, vec!["Intro", "Pricing"]);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    engine.set_value("keywords.location", json!("Germany")).unwrap();
    engine.reset().unwrap();

    assert_eq!(engine.get_settings(), &AppSettings::default());
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), AppSettings::default());
}

#[test]
fn test_missing_date_locale_uses_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{
            "generation": {"language": "de", "tone": "formal", "word_count": 1200},
            "recent": {"display_limit": 3},
            "keywords": {"language": "de", "location": "Germany"}
        }"#,
    )
    .unwrap();

    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    let settings = engine.load().unwrap();
    assert_eq!(settings.generation.tone, Tone::Formal);
    assert_eq!(settings.recent.display_limit, 3);
    assert_eq!(settings.recent.date_locale, "en");
    assert!(settings.generation.default_outline.is_empty());
}

#[test]
fn test_config_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);
    assert!(engine.get_config_path().ends_with("settings.json"));
}
