use std::{
	path::{
		Path,
		PathBuf,
	},
	time::Duration,
};

use derive_more::Display;
use serde::Deserialize;
use thiserror::Error;

use crate::deserializers::duration_from_millis;

/// Path value selecting an in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Default interval between two collector polls.
pub const DEFAULT_POLL_RATE: Duration = Duration::from_millis(200);

/// Location of the default database file, relative to the user's home.
pub const DEFAULT_DATABASE_PATH: &str = "~/.blockdb/databases/block.db";

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Database path is required")]
	MissingDatabasePath,
	#[error("Poll rate must be greater than zero")]
	ZeroPollRate,
	#[error("Source revision is required")]
	MissingSourceRevision,
	#[error("Cannot expand path `{0}`: `{1}`")]
	Expand(String, std::io::Error),
}

/// Where the database lives.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum DatabasePath {
	#[display(fmt = ":memory:")]
	Memory,
	#[display(fmt = "{}", "_0.display()")]
	File(PathBuf),
}

impl DatabasePath {
	/// Parse a user supplied path, expanding a leading `~`.
	pub fn parse(raw: &str) -> Result<Self, ConfigError> {
		let raw = raw.trim();
		if raw.is_empty() {
			return Err(ConfigError::MissingDatabasePath)
		}
		if raw == MEMORY_DATABASE {
			return Ok(DatabasePath::Memory)
		}
		let path =
			expanduser::expanduser(raw).map_err(|e| ConfigError::Expand(raw.to_owned(), e))?;
		Ok(DatabasePath::File(path))
	}

	pub fn is_memory(&self) -> bool {
		matches!(self, DatabasePath::Memory)
	}

	/// Filesystem path, `None` for in-memory databases.
	pub fn as_path(&self) -> Option<&Path> {
		match self {
			DatabasePath::Memory => None,
			DatabasePath::File(path) => Some(path.as_path()),
		}
	}
}

impl From<PathBuf> for DatabasePath {
	fn from(path: PathBuf) -> Self {
		if path.as_os_str() == MEMORY_DATABASE {
			return DatabasePath::Memory
		}
		DatabasePath::File(path)
	}
}

impl From<&Path> for DatabasePath {
	fn from(path: &Path) -> Self {
		path.to_path_buf().into()
	}
}

/// The default database file under the user's home directory.
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
	expanduser::expanduser(DEFAULT_DATABASE_PATH)
		.map_err(|e| ConfigError::Expand(DEFAULT_DATABASE_PATH.to_owned(), e))
}

/// Configuration recognised by the block database and its collectors.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub database_path: String,
	#[serde(
		rename = "poll_rate_ms",
		default = "default_poll_rate",
		deserialize_with = "duration_from_millis"
	)]
	pub poll_rate: Duration,
	pub source_revision: String,
}

impl Config {
	pub fn new(database_path: impl Into<String>, source_revision: impl Into<String>) -> Self {
		Self {
			database_path: database_path.into(),
			poll_rate: DEFAULT_POLL_RATE,
			source_revision: source_revision.into(),
		}
	}

	pub fn with_poll_rate(mut self, poll_rate: Duration) -> Self {
		self.poll_rate = poll_rate;
		self
	}

	/// Check every field and resolve the database location.
	pub fn validate(&self) -> Result<DatabasePath, ConfigError> {
		let path = DatabasePath::parse(&self.database_path)?;
		if self.poll_rate.is_zero() {
			return Err(ConfigError::ZeroPollRate)
		}
		if self.source_revision.trim().is_empty() {
			return Err(ConfigError::MissingSourceRevision)
		}
		Ok(path)
	}
}

/// Serde default for `Config::poll_rate`.
fn default_poll_rate() -> Duration {
	DEFAULT_POLL_RATE
}
