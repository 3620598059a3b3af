use blockdb_primitives::context::Context;
use rusqlite::{
	params,
	Connection,
	Transaction,
	TransactionBehavior,
};
use tracing::{
	debug,
	info,
};

use crate::{
	connection,
	errors::{
		Result,
		ResultExt,
		StorageError,
	},
	sqlite,
	timestamp,
	views,
	BlockDB,
};

impl BlockDB {
	/// Bring the schema up to date and stamp it with `source_revision`.
	///
	/// Idempotent for a revision already recorded. On error the whole migration is rolled
	/// back; deleting the database file and retrying is an acceptable recovery.
	pub async fn migrate(&self, ctx: &Context, source_revision: &str) -> Result<()> {
		if source_revision.trim().is_empty() {
			return Err(StorageError::Validation("source revision is required".to_owned())
				.context("migrate"))
		}
		let revision = source_revision.to_owned();
		self.with_conn(ctx, "migrate", move |conn| migrate(conn, &revision)).await?;
		info!(message = "Schema migrated", revision = source_revision);
		Ok(())
	}
}

/// Apply every migration step inside a single transaction.
pub(crate) fn migrate(conn: &mut Connection, source_revision: &str) -> Result<()> {
	connection::apply_pragmas(conn)?;

	let dbtx = conn
		.transaction_with_behavior(TransactionBehavior::Immediate)
		.context("begin migration")?;

	dbtx.execute_batch(sqlite::DB_CREATE_SCHEMA_VERSION).context("create schema_version")?;
	dbtx.execute(sqlite::DB_UPSERT_SCHEMA_VERSION, params![timestamp(), source_revision])
		.context("upsert schema version")?;

	for (table, sql) in [
		("test_case", sqlite::DB_CREATE_TEST_CASE),
		("chain", sqlite::DB_CREATE_CHAIN),
		("block", sqlite::DB_CREATE_BLOCK),
		("tx", sqlite::DB_CREATE_TX),
		("tendermint_event", sqlite::DB_CREATE_TENDERMINT_EVENT),
	] {
		dbtx.execute_batch(sql).map_err(|e| {
			debug!(message = "Create table failed", table = table);
			StorageError::from(e).context("create tables")
		})?;
	}

	for sql in sqlite::DB_EVOLVE_COLUMNS {
		add_column(&dbtx, sql)?;
	}

	dbtx.execute_batch(views::DB_DROP_VIEWS).context("drop views")?;
	for sql in
		[views::DB_CREATE_TX_FLATTENED, views::DB_CREATE_COSMOS_MESSAGES, views::DB_CREATE_TX_AGG]
	{
		dbtx.execute_batch(sql).context("create views")?;
	}

	dbtx.commit().context("commit migration")
}

/// Run an `ADD COLUMN` statement, treating an existing column as success.
fn add_column(dbtx: &Transaction, sql: &str) -> Result<()> {
	match dbtx.execute_batch(sql) {
		Ok(()) => Ok(()),
		Err(e) if is_duplicate_column(&e) => {
			debug!(message = "Column already exists", statement = sql);
			Ok(())
		},
		Err(e) => Err(StorageError::from(e).context("add column")),
	}
}

fn is_duplicate_column(error: &rusqlite::Error) -> bool {
	match error {
		rusqlite::Error::SqliteFailure(_, Some(message)) =>
			message.contains("duplicate column name"),
		_ => false,
	}
}
