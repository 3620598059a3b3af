use blockdb_primitives::{
	context::Context,
	types::ChainKey,
};
use chrono::{
	DateTime,
	Local,
};
use rusqlite::{
	params,
	OptionalExtension,
	Row,
};

use crate::{
	errors::{
		Result,
		ResultExt,
		StorageError,
	},
	types::{
		CosmosMessage,
		SchemaVersion,
		TestCaseSummary,
		TxRecord,
	},
	BlockDB,
};

/// Latest schema stamp.
const DB_CURRENT_SCHEMA_VERSION: &str = "
SELECT git_sha, created_at FROM schema_version ORDER BY id DESC LIMIT 1
";

/// Most recent test cases with one row per registered chain.
const DB_RECENT_TEST_CASES: &str = "
SELECT
    tc.id,
    tc.created_at,
    tc.name,
    tc.git_sha,
    agg.chain_kid,
    agg.chain_id,
    agg.chain_type,
    agg.chain_height,
    agg.tx_total
FROM test_case AS tc
JOIN v_tx_agg AS agg ON agg.test_case_id = tc.id
WHERE tc.id IN (SELECT id FROM test_case ORDER BY id DESC LIMIT ?1)
ORDER BY tc.id DESC, agg.chain_kid ASC
";

/// Unnested messages of a chain.
const DB_COSMOS_MESSAGES: &str = "
SELECT
    block_height,
    tx_id,
    msg_n,
    type,
    client_chain_id,
    client_id,
    counterparty_client_id,
    conn_id,
    counterparty_conn_id,
    port_id,
    counterparty_port_id,
    channel_id,
    counterparty_channel_id,
    raw
FROM v_cosmos_messages
WHERE chain_kid = ?1
ORDER BY block_height ASC, msg_n ASC, tx_id ASC
";

/// Transactions of a chain.
const DB_TRANSACTIONS: &str = "
SELECT block_height, tx_id, tx
FROM v_tx_flattened
WHERE chain_kid = ?1
ORDER BY block_height ASC, tx_id ASC
";

impl BlockDB {
	/// The revision that most recently migrated the schema.
	pub async fn current_schema_version(&self, ctx: &Context) -> Result<SchemaVersion> {
		let row = self
			.with_conn(ctx, "current schema version", |conn| {
				conn.query_row(DB_CURRENT_SCHEMA_VERSION, [], |row| {
					Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
				})
				.optional()
				.context("select schema version")
			})
			.await?;

		let (source_revision, created_at) =
			row.ok_or_else(|| {
				StorageError::NotFound("schema version").context("current schema version")
			})?;
		Ok(SchemaVersion { source_revision, created_at: parse_local(created_at)? })
	}

	/// Summaries of the `limit` most recent test cases, newest first.
	pub async fn recent_test_cases(
		&self,
		ctx: &Context,
		limit: u32,
	) -> Result<Vec<TestCaseSummary>> {
		self.with_conn(ctx, "recent test cases", move |conn| {
			let mut stmt = conn.prepare_cached(DB_RECENT_TEST_CASES).context("prepare")?;
			let rows = stmt
				.query_map(params![limit], |row| {
					Ok((
						row.get::<_, i64>(0)?,
						row.get::<_, String>(1)?,
						row.get::<_, String>(2)?,
						row.get::<_, String>(3)?,
						row.get::<_, Option<i64>>(4)?,
						row.get::<_, Option<String>>(5)?,
						row.get::<_, Option<String>>(6)?,
						row.get::<_, i64>(7)?,
						row.get::<_, i64>(8)?,
					))
				})
				.context("query")?;

			let mut summaries = vec![];
			for row in rows {
				let (
					id,
					created_at,
					name,
					source_revision,
					chain_key,
					chain_id,
					chain_type,
					height,
					total,
				) = row.context("read row")?;
				summaries.push(TestCaseSummary {
					id,
					created_at: parse_local(created_at)?,
					name,
					source_revision,
					chain_key,
					chain_id,
					chain_type,
					height: to_unsigned(height)?,
					tx_total: to_unsigned(total)?,
				});
			}
			Ok(summaries)
		})
		.await
	}

	/// Every Cosmos message recorded for `chain`, in block order.
	pub async fn cosmos_messages(
		&self,
		ctx: &Context,
		chain: ChainKey,
	) -> Result<Vec<CosmosMessage>> {
		self.with_conn(ctx, "cosmos messages", move |conn| {
			let mut stmt = conn.prepare_cached(DB_COSMOS_MESSAGES).context("prepare")?;
			let rows = stmt.query_map(params![chain], cosmos_message).context("query")?;
			let mut messages = vec![];
			for row in rows {
				let (height, message) = row.context("read row")?;
				messages.push(CosmosMessage { height: to_unsigned(height)?, ..message });
			}
			Ok(messages)
		})
		.await
	}

	/// Every transaction recorded for `chain`, in block order.
	pub async fn transactions(&self, ctx: &Context, chain: ChainKey) -> Result<Vec<TxRecord>> {
		self.with_conn(ctx, "transactions", move |conn| {
			let mut stmt = conn.prepare_cached(DB_TRANSACTIONS).context("prepare")?;
			let rows = stmt
				.query_map(params![chain], |row| {
					Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
				})
				.context("query")?;
			let mut txs = vec![];
			for row in rows {
				let (height, tx_id, data) = row.context("read row")?;
				txs.push(TxRecord { height: to_unsigned(height)?, tx_id, data });
			}
			Ok(txs)
		})
		.await
	}
}

/// Map a `v_cosmos_messages` row. The height is returned apart as it is stored signed.
fn cosmos_message(row: &Row) -> rusqlite::Result<(i64, CosmosMessage)> {
	Ok((
		row.get(0)?,
		CosmosMessage {
			height: 0,
			tx_id: row.get(1)?,
			msg_n: row.get(2)?,
			msg_type: row.get(3)?,
			client_chain_id: row.get(4)?,
			client_id: row.get(5)?,
			counterparty_client_id: row.get(6)?,
			conn_id: row.get(7)?,
			counterparty_conn_id: row.get(8)?,
			port_id: row.get(9)?,
			counterparty_port_id: row.get(10)?,
			channel_id: row.get(11)?,
			counterparty_channel_id: row.get(12)?,
			raw: row.get(13)?,
		},
	))
}

/// Parse a stored RFC3339 timestamp into the local zone.
fn parse_local(value: String) -> Result<DateTime<Local>> {
	match DateTime::parse_from_rfc3339(&value) {
		Ok(parsed) => Ok(parsed.with_timezone(&Local)),
		Err(e) => Err(StorageError::Timestamp(value, e)),
	}
}

fn to_unsigned(value: i64) -> Result<u64> {
	u64::try_from(value).map_err(|_| StorageError::Validation(format!("negative value {}", value)))
}
