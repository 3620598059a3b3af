use std::sync::Arc;

use blockdb_primitives::context::Cancelled;
use rusqlite::{
	ffi,
	ErrorCode,
};
use thiserror::Error;

/// Result of a storage operation.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error type.
#[derive(Error, Debug)]
pub enum StorageError {
	#[error("Storage lock poisoned")]
	CannotLock,
	#[error("Invalid input: `{0}`")]
	Validation(String),
	#[error("Unique constraint violated: `{0}`")]
	UniqueConstraint(String),
	#[error("Database is locked: `{0}`")]
	Contention(String),
	#[error("Not found: `{0}`")]
	NotFound(&'static str),
	#[error("IO error: `{0}`")]
	Io(#[from] std::io::Error),
	#[error("SQL Error: `{0}`")]
	Sql(rusqlite::Error),
	#[error("Cannot serialize for storage: `{0}`")]
	Serialization(#[from] serde_json::Error),
	#[error("Cannot parse timestamp `{0}`: `{1}`")]
	Timestamp(String, chrono::ParseError),
	#[error(transparent)]
	Cancelled(#[from] Cancelled),
	#[error("Blocking task failed: `{0}`")]
	Join(#[from] tokio::task::JoinError),
	#[error("{op}: {source}")]
	Context { op: &'static str, source: Box<StorageError> },
	#[error(transparent)]
	Shared(Arc<StorageError>),
}

impl StorageError {
	/// Wrap the error with the name of the operation that failed.
	pub fn context(self, op: &'static str) -> Self {
		StorageError::Context { op, source: Box::new(self) }
	}

	/// The underlying error, with operation context and sharing unwrapped.
	pub fn root(&self) -> &StorageError {
		match self {
			StorageError::Context { source, .. } => source.root(),
			StorageError::Shared(inner) => inner.root(),
			other => other,
		}
	}

	pub fn is_validation(&self) -> bool {
		matches!(self.root(), StorageError::Validation(_))
	}

	pub fn is_unique_constraint(&self) -> bool {
		matches!(self.root(), StorageError::UniqueConstraint(_))
	}

	pub fn is_contention(&self) -> bool {
		matches!(self.root(), StorageError::Contention(_))
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self.root(), StorageError::Cancelled(_))
	}
}

impl From<rusqlite::Error> for StorageError {
	fn from(error: rusqlite::Error) -> Self {
		if let rusqlite::Error::SqliteFailure(failure, message) = &error {
			let detail = message.clone().unwrap_or_else(|| failure.to_string());
			match failure.code {
				ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked =>
					return StorageError::Contention(detail),
				ErrorCode::ConstraintViolation => match failure.extended_code {
					ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
						return StorageError::UniqueConstraint(detail),
					ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL =>
						return StorageError::Validation(detail),
					_ => {},
				},
				_ => {},
			}
		}
		StorageError::Sql(error)
	}
}

/// Attach operation context to fallible storage calls.
pub trait ResultExt<T> {
	fn context(self, op: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
	E: Into<StorageError>,
{
	fn context(self, op: &'static str) -> Result<T> {
		self.map_err(|e| e.into().context(op))
	}
}
