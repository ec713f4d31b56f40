use std::io::Write;

use sonarview::config::{SensorMode, SonarConfig};
use sonarview::ConfigError;

#[test]
fn partial_yaml_file_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "sensor:\n  mode: simulated\n  trigger_pin: 5\ngauge:\n  max_range_cm: 200\ntrials:\n  data_dir: /data/trials"
    )
    .unwrap();

    let cfg = SonarConfig::from_file(file.path()).unwrap();
    assert_eq!(cfg.sensor.mode, SensorMode::Simulated);
    assert_eq!(cfg.sensor.trigger_pin, 5);
    assert_eq!(cfg.sensor.echo_pin, 10);
    assert_eq!(cfg.gauge.max_range_cm, 200.0);
    assert_eq!(cfg.gauge.bar_pixel_width, 280.0);
    assert_eq!(cfg.trials.files.len(), 6);
    assert_eq!(
        cfg.trials.resolve("LeituraSubidaSonar1.csv"),
        std::path::Path::new("/data/trials/LeituraSubidaSonar1.csv")
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SonarConfig::from_file(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn bad_mode_is_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "sensor:\n  mode: bluetooth").unwrap();
    let err = SonarConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("invalid config"));
}

#[test]
fn unusable_gauge_scale_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "gauge:\n  max_range_cm: .nan\n  bar_pixel_width: -5").unwrap();
    let err = SonarConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}
