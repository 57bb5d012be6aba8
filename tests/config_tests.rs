use hivetime::config::Config;
use hivetime::config::check::{migrate_file, missing_fields};
use hivetime::errors::AppError;
use hivetime::utils::time::{format_seconds, humanize_seconds};
use hivetime::utils::parse_duration;
use std::fs;

#[test]
fn durations_parse() {
    assert_eq!(parse_duration("90").unwrap(), 90);
    assert_eq!(parse_duration("90s").unwrap(), 90);
    assert_eq!(parse_duration("45m").unwrap(), 2700);
    assert_eq!(parse_duration("2h").unwrap(), 7200);
    assert_eq!(parse_duration("1h30m").unwrap(), 5400);
    assert_eq!(parse_duration(" 1H30M15S ").unwrap(), 5415);
}

#[test]
fn bad_durations_are_rejected() {
    for bad in ["", "-5", "h", "1x", "30m1h", "1h1h", "12m5"] {
        assert!(
            matches!(parse_duration(bad), Err(AppError::InvalidDuration(_))),
            "accepted {bad:?}"
        );
    }
}

#[test]
fn oversized_durations_are_rejected() {
    for huge in ["9999999999999999h", "99999999999999999999", "153722867280912931m", "2562047788015215h59m"] {
        assert!(
            matches!(parse_duration(huge), Err(AppError::InvalidDuration(_))),
            "accepted {huge:?}"
        );
    }
}

#[test]
fn seconds_format() {
    assert_eq!(format_seconds(0), "00:00:00");
    assert_eq!(format_seconds(3725), "01:02:05");
    assert_eq!(format_seconds(360_000), "100:00:00");
    assert_eq!(humanize_seconds(45), "45s");
    assert_eq!(humanize_seconds(750), "12m 30s");
    assert_eq!(humanize_seconds(3900), "1h 05m");
    assert_eq!(humanize_seconds(-60), "-1m 00s");
}

#[test]
fn old_config_files_get_new_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hivetime.conf");
    fs::write(&path, "database: /tmp/x.sqlite\ndefault_user: carol\n").unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let missing = missing_fields(&content).unwrap();
    assert!(missing.contains(&"warning_threshold".to_string()));
    assert!(missing.contains(&"require_active_session".to_string()));
    assert!(!missing.contains(&"database".to_string()));

    let added = migrate_file(&path).unwrap();
    assert_eq!(added, missing);

    let cfg = Config::load_from(&path).unwrap();
    assert_eq!(cfg.database, "/tmp/x.sqlite");
    assert_eq!(cfg.default_user, "carol");
    assert_eq!(cfg.warning_threshold, 70.0);
    assert!(missing_fields(&fs::read_to_string(&path).unwrap()).unwrap().is_empty());
    assert!(migrate_file(&path).unwrap().is_empty());
}

#[test]
fn inverted_thresholds_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hivetime.conf");
    fs::write(
        &path,
        "database: x.sqlite\nwarning_threshold: 90\ncritical_threshold: 80\n",
    )
    .unwrap();
    assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::load_from(&dir.path().join("absent.conf")).unwrap();
    assert_eq!(cfg.poll_interval_ms, 2000);
    assert_eq!(cfg.tick_interval().as_millis(), 1000);
    assert!(cfg.require_active_session);
}
