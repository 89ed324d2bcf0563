//! Tests for loading replica configuration from disk.

use std::io::Write;
use tabsync::ReplicaConfig;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "channel = \"tabs\"\ncapacity = 8\nidentity_prefix = \"Tab\"").unwrap();

    let config = ReplicaConfig::from_file(file.path()).unwrap();
    assert_eq!(config.channel(), "tabs");
    assert_eq!(*config.capacity(), 8);
    assert_eq!(config.identity_prefix(), "Tab");
    assert!(!*config.announce_snapshot_on_join());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReplicaConfig::load(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.capacity(), ReplicaConfig::default().capacity());
    assert_eq!(config.identity_prefix(), "Player");
}

#[test]
fn test_unreadable_file_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ReplicaConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}
