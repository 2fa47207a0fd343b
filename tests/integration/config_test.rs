//! Integration tests for configuration loading

use price_tracker::config::{Config, ConfigError, RendererKind};
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_example_config_loads() {
    let config: Config = toml::from_str(include_str!("../../price-tracker.toml.example")).unwrap();
    assert_eq!(config.source.renderer, RendererKind::Chrome);
    assert_eq!(config.tracker.interval_secs, 600);
    assert!(config.settings().is_ok());
}

#[test]
fn test_file_then_env_override() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [tracker]
        url = "https://shop.example.com/dp/B0TEST"
        baseline = 2000
        threshold = 5

        [notify]
        webhook_url = "https://hooks.example.com/T/B/X"
        "#
    )
    .unwrap();

    let config = Config::load_or_default(file.path())
        .unwrap()
        .with_overrides(|key| (key == "THRESHOLD").then(|| "12.5".to_string()))
        .unwrap();
    let settings = config.settings().unwrap();
    assert_eq!(settings.baseline, dec!(2000));
    assert_eq!(settings.threshold, dec!(12.5));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[tracker\nurl = ").unwrap();
    let result = Config::load(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
