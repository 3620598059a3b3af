use std::{
	path::PathBuf,
	time::Duration,
};

use serde_json::json;

use crate::config::{
	Config,
	ConfigError,
	DatabasePath,
	DEFAULT_POLL_RATE,
};

#[test]
fn test_memory_sentinel_selects_memory_database() {
	let path = DatabasePath::parse(":memory:").expect("Should parse");
	assert!(path.is_memory());
	assert_eq!(path.as_path(), None);
	assert_eq!(path.to_string(), ":memory:");
}

#[test]
fn test_file_path_is_kept() {
	let path = DatabasePath::parse("/tmp/blockdb/block.db").expect("Should parse");
	assert_eq!(path, DatabasePath::File(PathBuf::from("/tmp/blockdb/block.db")));
	assert!(!path.is_memory());
	assert_eq!(path.to_string(), "/tmp/blockdb/block.db");
}

#[test]
fn test_empty_database_path_is_rejected() {
	assert!(matches!(DatabasePath::parse("  "), Err(ConfigError::MissingDatabasePath)));
}

#[test]
fn test_config_defaults_poll_rate() {
	let config: Config = serde_json::from_value(json!({
		"database_path": ":memory:",
		"source_revision": "abc123",
	}))
	.expect("Should deserialize");
	assert_eq!(config.poll_rate, DEFAULT_POLL_RATE);
	assert_eq!(config.poll_rate, Duration::from_millis(200));
	assert!(config.validate().expect("Should validate").is_memory());
}

#[test]
fn test_config_reads_poll_rate_in_millis() {
	let config: Config = serde_json::from_value(json!({
		"database_path": ":memory:",
		"poll_rate_ms": 150,
		"source_revision": "abc123",
	}))
	.expect("Should deserialize");
	assert_eq!(config.poll_rate, Duration::from_millis(150));
}

#[test]
fn test_config_rejects_zero_poll_rate() {
	let config = Config::new(":memory:", "abc123").with_poll_rate(Duration::ZERO);
	assert!(matches!(config.validate(), Err(ConfigError::ZeroPollRate)));
}

#[test]
fn test_config_rejects_empty_revision() {
	let config = Config::new(":memory:", "");
	assert!(matches!(config.validate(), Err(ConfigError::MissingSourceRevision)));
}
