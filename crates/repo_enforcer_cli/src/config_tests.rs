use super::*;
use github_client::Repository;
use repo_enforcer_core::SettingValue;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();

    assert!(config.slack_webhook.is_none());
    assert!(config.branches.is_empty());
    assert!(config.repository_settings.is_empty());
    assert!(config.branch_settings.is_empty());
}

#[test]
fn test_app_config_from_full_toml() {
    let content = r#"
slack_webhook = "https://hooks.slack.com/services/T000/B000/XXXX"
branches = ["develop", "release"]

[repository_settings]
allow_auto_merge = true
default_branch = "main"

[branch_settings]
dismiss_stale_reviews = true
required_approving_review_count = 2

[exclusions]
prefixes = ["sandbox-"]
names = ["legacy-monolith"]
"#;

    let config = AppConfig::from_toml(content).expect("Failed to parse config");

    assert_eq!(
        config.slack_webhook.as_deref(),
        Some("https://hooks.slack.com/services/T000/B000/XXXX")
    );
    assert_eq!(config.branches, vec!["develop", "release"]);
    assert_eq!(
        config.repository_settings["allow_auto_merge"],
        SettingValue::Bool(true)
    );
    assert_eq!(
        config.repository_settings["default_branch"],
        SettingValue::Str("main".to_string())
    );
    assert_eq!(
        config.branch_settings["required_approving_review_count"],
        SettingValue::Int(2)
    );
    assert_eq!(config.exclusions.prefixes, vec!["sandbox-"]);
    assert_eq!(config.exclusions.names, vec!["legacy-monolith"]);
}

#[test]
fn test_app_config_rejects_unknown_keys() {
    let result = AppConfig::from_toml("slack_hook = \"https://example.com\"");

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_app_config_rejects_unsupported_setting_values() {
    let result = AppConfig::from_toml("[repository_settings]\ntopics = [\"rust\"]");

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_app_config_load_invalid_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid_config.toml");

    fs::write(&config_path, "invalid = toml = syntax").expect("Failed to write invalid TOML");

    let result = AppConfig::load(&config_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Failed to parse configuration file"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_nonexistent_file() {
    let nonexistent_path = PathBuf::from("nonexistent_config.toml");
    let result = AppConfig::load(&nonexistent_path);

    if let Err(Error::Config(msg)) = result {
        assert!(msg.contains("Configuration file not found"));
    } else {
        panic!("Expected Config error");
    }
}

#[test]
fn test_app_config_load_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("enforcer.toml");
    fs::write(&config_path, "branches = [\"develop\"]\n").expect("Failed to write config");

    let config = AppConfig::load(&config_path).expect("Failed to load config");

    assert_eq!(config.branches, vec!["develop"]);
}

#[test]
fn test_exclusion_rules_keep_builtin_entries() {
    let config = AppConfig::from_toml("[exclusions]\nprefixes = [\"sandbox-\"]").unwrap();
    let rules = config.exclusion_rules();

    let sandbox = Repository::new("sandbox-app".to_string(), "org/sandbox-app".to_string());
    let demo = Repository::new("demo-x".to_string(), "org/demo-x".to_string());
    let service = Repository::new("billing".to_string(), "org/billing".to_string());

    assert!(rules.exclusion_reason(&sandbox).is_some());
    assert!(rules.exclusion_reason(&demo).is_some());
    assert!(rules.exclusion_reason(&service).is_none());
}
