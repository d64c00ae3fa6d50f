//! Integration tests for [`neck_mobility_core::config`].

use neck_mobility_core::config::MobilityConfig;
use neck_mobility_core::error::ConfigError;
use neck_mobility_core::{DiagnosisSession, MobilityError};
use tempfile::tempdir;

#[test]
fn json_round_trip_preserves_every_field() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("mobility.json");

    let cfg = MobilityConfig {
        bilateral_blend_factor: 0.5,
        shoulder_tilt_threshold_deg: 12.5,
        enforce_shoulder_level: false,
        ..MobilityConfig::default()
    };
    cfg.to_json(&path).expect("write config");

    let loaded = MobilityConfig::from_json(&path).expect("read config");
    assert_eq!(loaded, cfg);
}

#[test]
fn partial_json_uses_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{ "smoothing_alpha": 0.7 }"#).unwrap();

    let loaded = MobilityConfig::from_json(&path).unwrap();
    assert_eq!(loaded.smoothing_alpha, 0.7);
    assert_eq!(loaded.anchor_vertical_ratio, 0.7);
    assert!(loaded.enforce_shoulder_level);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = MobilityConfig::from_json(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "got {err}");
}

#[test]
fn out_of_range_value_is_rejected_on_load() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "shoulder_tilt_threshold_deg": 120.0 }"#).unwrap();

    let err = MobilityConfig::from_json(&path).unwrap_err();
    assert!(err.to_string().contains("shoulder_tilt_threshold_deg"));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempdir().expect("tempdir");
    let err = MobilityConfig::from_json(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::FileRead { .. }));
}

#[test]
fn session_refuses_invalid_config() {
    let cfg = MobilityConfig {
        visibility_threshold: 1.5,
        ..MobilityConfig::default()
    };
    let err = DiagnosisSession::with_config(cfg).unwrap_err();
    assert!(matches!(err, MobilityError::Config(ConfigError::InvalidValue { .. })));
}
