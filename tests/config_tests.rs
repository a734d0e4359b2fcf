//! Settings file loading tests

use orgdeck::config::Settings;
use orgdeck::error::PanelError;
use orgdeck::system::RealSystem;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_settings(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_full_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(
        &temp_dir,
        r#"
cliPath: /opt/sf/bin/sf
stateFile: /tmp/orgdeck/state.json
minCliVersion: "2.40.0"
hideDisconnected: false
skipPreflight: true
timeBuckets:
  justNowSecs: 30
  daysUntil: 14
"#,
    );

    let settings = Settings::load(&RealSystem::new(), Some(&path)).unwrap();

    assert_eq!(settings.cli_path, "/opt/sf/bin/sf");
    assert_eq!(
        settings.state_file.as_deref(),
        Some(Path::new("/tmp/orgdeck/state.json"))
    );
    assert_eq!(settings.min_cli_version, "2.40.0");
    assert!(!settings.hide_disconnected);
    assert!(settings.skip_preflight);
    assert_eq!(settings.time_buckets.just_now_secs, 30);
    assert_eq!(settings.time_buckets.minutes_until, 60);
    assert_eq!(settings.time_buckets.days_until, 14);
}

#[test]
fn test_empty_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(&temp_dir, "# nothing configured yet\n");

    let settings = Settings::load(&RealSystem::new(), Some(&path)).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn test_missing_explicit_file_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.yaml");

    let err = Settings::load(&RealSystem::new(), Some(&path)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PanelError>(),
        Some(PanelError::Configuration { .. })
    ));
    assert!(err.to_string().contains("Settings file not found"));
}

#[test]
fn test_unknown_key_rejected_by_schema() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(&temp_dir, "cliPath: sf\ntheme: dark\n");

    let err = Settings::load(&RealSystem::new(), Some(&path)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PanelError>(),
        Some(PanelError::Configuration { .. })
    ));
    assert!(format!("{err:#}").contains("theme"));
}

#[test]
fn test_bad_version_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(&temp_dir, "minCliVersion: latest\n");

    assert!(Settings::load(&RealSystem::new(), Some(&path)).is_err());
}

#[test]
fn test_zero_bucket_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(&temp_dir, "timeBuckets:\n  hoursUntil: 0\n");

    assert!(Settings::load(&RealSystem::new(), Some(&path)).is_err());
}

#[test]
fn test_malformed_yaml_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_settings(&temp_dir, "cliPath: [unterminated\n");

    let err = Settings::load(&RealSystem::new(), Some(&path)).unwrap_err();

    assert!(format!("{err:#}").contains("Failed to parse YAML settings"));
}

#[test]
fn test_explicit_state_file_wins() {
    let settings = Settings {
        state_file: Some("/srv/orgdeck/state.json".into()),
        ..Settings::default()
    };

    assert_eq!(
        settings.state_path().unwrap(),
        Path::new("/srv/orgdeck/state.json")
    );
}
