// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use sessiongate_backend::config::{AuthType, Settings, DEFAULT_SESSION_NAME};
use std::path::PathBuf;

fn shipped_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../config/default.toml")
}

#[test]
fn test_shipped_config_matches_defaults() {
    let settings: Settings = Settings::figment(&shipped_config()).extract().unwrap();
    settings.validate().unwrap();

    let defaults = Settings::default();
    assert_eq!(settings.auth, defaults.auth);
    assert_eq!(settings.redaction, defaults.redaction);
    assert_eq!(settings.auth.session_name, DEFAULT_SESSION_NAME);
    assert_eq!(settings.server.port, 5000);
}

#[test]
fn test_auth_type_names() {
    for (name, auth_type) in [
        ("none", AuthType::NoAuth),
        ("basic_auth", AuthType::BasicAuth),
        ("session_auth", AuthType::SessionAuth),
        ("session_exp_auth", AuthType::SessionExpAuth),
        ("session_db_auth", AuthType::SessionDbAuth),
    ] {
        let parsed: AuthType = serde_json::from_value(serde_json::json!(name)).unwrap();
        assert_eq!(parsed, auth_type);
        assert_eq!(auth_type.as_str(), name);
    }

    assert!(serde_json::from_value::<AuthType>(serde_json::json!("magic")).is_err());
}

#[test]
fn test_only_session_schemes_issue_sessions() {
    assert!(!AuthType::NoAuth.uses_sessions());
    assert!(!AuthType::BasicAuth.uses_sessions());
    assert!(AuthType::SessionAuth.uses_sessions());
    assert!(AuthType::SessionExpAuth.uses_sessions());
    assert!(AuthType::SessionDbAuth.uses_sessions());
}
