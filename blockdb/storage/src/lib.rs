#![warn(clippy::missing_docs_in_private_items)]

//! Embedded block database recording every block and transaction produced by the chains of
//! an integration test run.

use std::sync::{
	Arc,
	Mutex,
};

use blockdb_primitives::{
	config::DatabasePath,
	context::Context,
};
use chrono::{
	SecondsFormat,
	Utc,
};
use rusqlite::Connection;

use crate::singleflight::SingleFlight;

pub use crate::{
	chain::Chain,
	errors::{
		Result,
		StorageError,
	},
	test_case::TestCase,
	types::{
		CosmosMessage,
		SchemaVersion,
		TestCaseSummary,
		TxRecord,
	},
};

/// Block persistence.
pub mod chain;
/// Connection setup.
pub mod connection;
/// Storage errors.
pub mod errors;
/// Schema migrations.
pub mod migrate;
/// Read API used by the dashboard and tests.
pub mod query;
/// In-process call deduplication.
pub mod singleflight;
/// Table SQL.
mod sqlite;
/// Test case persistence.
pub mod test_case;
#[cfg(test)]
mod tests;
/// Row types returned by queries.
pub mod types;
/// View SQL.
mod views;

/// Outcome of a block save, shared between deduplicated callers.
pub(crate) type SaveOutcome = std::result::Result<(), Arc<StorageError>>;

/// Handle to the block database.
///
/// Clones share the single writer connection; every operation is serialised on it, and the
/// engine's busy timeout arbitrates with other processes opening the same file.
#[derive(Clone, Debug)]
pub struct BlockDB {
	conn: Arc<Mutex<Connection>>,
	flights: Arc<SingleFlight<SaveOutcome>>,
	path: DatabasePath,
}

impl BlockDB {
	/// Open the database at `path`, creating its parent directory when needed.
	pub fn connect(path: impl Into<DatabasePath>) -> Result<Self> {
		let path = path.into();
		let conn = connection::open(&path)?;
		Ok(Self { conn: Arc::new(Mutex::new(conn)), flights: Arc::new(SingleFlight::new()), path })
	}

	/// Open a private in-memory database.
	pub fn connect_in_memory() -> Result<Self> {
		Self::connect(DatabasePath::Memory)
	}

	pub fn path(&self) -> &DatabasePath {
		&self.path
	}

	pub fn is_memory(&self) -> bool {
		self.path.is_memory()
	}

	/// Check the connection still answers.
	pub async fn ping(&self, ctx: &Context) -> Result<()> {
		self.with_conn(ctx, "ping", |conn| connection::ping(conn)).await
	}

	/// Run `op` against the connection on the blocking pool.
	///
	/// The caller stops waiting when `ctx` is cancelled; a statement already executing still
	/// runs to completion.
	pub(crate) async fn with_conn<T, F>(&self, ctx: &Context, op: &'static str, f: F) -> Result<T>
	where
		F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
		T: Send + 'static,
	{
		ctx.check().map_err(|e| StorageError::from(e).context(op))?;
		let conn = Arc::clone(&self.conn);
		let task = tokio::task::spawn_blocking(move || {
			let mut conn = conn.lock().map_err(|_| StorageError::CannotLock)?;
			f(&mut conn)
		});
		let joined = ctx.run(task).await.map_err(|e| StorageError::from(e).context(op))?;
		joined.map_err(StorageError::from).and_then(|result| result).map_err(|e| e.context(op))
	}
}

/// Current time as stored in `created_at` columns.
pub(crate) fn timestamp() -> String {
	Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}
