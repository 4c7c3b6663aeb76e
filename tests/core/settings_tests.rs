//! Tests for user settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Serialization/deserialization
//! - Settings roundtrip
//! - Config path handling

use apextrace::client::DEFAULT_ENDPOINT;
use apextrace::settings::{RequestForm, UserSettings};

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_defaults() {
    let settings = UserSettings::default();
    assert_eq!(settings.version, 1);
    assert_eq!(settings.endpoint_url, DEFAULT_ENDPOINT);
    assert!(!settings.color_blind_mode);
    assert_eq!(settings.last_request.drivers, "VER, LEC");
}

// ============================================
// Serialization Tests
// ============================================

#[test]
fn test_settings_serialize_fields() {
    let json = serde_json::to_string(&UserSettings::default()).unwrap();
    assert!(json.contains("version"));
    assert!(json.contains("endpoint_url"));
    assert!(json.contains("color_blind_mode"));
    assert!(json.contains("last_request"));
}

#[test]
fn test_settings_deserialize_empty_object() {
    let settings: UserSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, UserSettings::default());
}

#[test]
fn test_settings_roundtrip() {
    let original = UserSettings {
        version: 1,
        endpoint_url: "http://telemetry.local:8080".to_string(),
        color_blind_mode: true,
        last_request: RequestForm {
            year: "2021".to_string(),
            race: "Abu Dhabi".to_string(),
            drivers: "VER, HAM".to_string(),
        },
    };
    let json = serde_json::to_string_pretty(&original).unwrap();
    let restored: UserSettings = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);
}

// ============================================
// Config Path Tests
// ============================================

#[test]
fn test_settings_path_is_json_in_app_dir() {
    if let Some(path) = UserSettings::get_settings_path() {
        assert!(path.ends_with("apextrace/settings.json"));
    }
}

#[test]
fn test_load_missing_file_gives_defaults() {
    let path = std::env::temp_dir().join("apextrace-does-not-exist/settings.json");
    assert_eq!(UserSettings::load_from(&path), UserSettings::default());
}
