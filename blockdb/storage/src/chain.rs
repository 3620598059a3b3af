use std::sync::Arc;

use async_trait::async_trait;
use blockdb_primitives::{
	context::Context,
	traits::BlockSaver,
	types::{
		ChainKey,
		Height,
		TestCaseId,
		Tx,
		TxEvent,
	},
};
use rusqlite::{
	params,
	Connection,
	TransactionBehavior,
};
use tracing::{
	debug,
	trace,
};

use crate::{
	errors::{
		Result,
		ResultExt,
		StorageError,
	},
	sqlite,
	timestamp,
	BlockDB,
};

/// A chain registered under a test case. Blocks are saved through it.
#[derive(Clone, Debug)]
pub struct Chain {
	pub id: ChainKey,
	pub chain_id: String,
	pub chain_type: String,
	pub test_case_id: TestCaseId,
	db: BlockDB,
}

/// A validated transaction ready to be written.
struct TxRow {
	data: String,
	events: Vec<TxEvent>,
}

impl Chain {
	pub(crate) fn new(
		db: BlockDB,
		id: ChainKey,
		chain_id: String,
		chain_type: String,
		test_case_id: TestCaseId,
	) -> Self {
		Self { id, chain_id, chain_type, test_case_id, db }
	}

	/// Persist the block at `height` with its transactions.
	///
	/// The block and its transactions are written atomically. Saving a height that already
	/// exists refreshes the block's timestamp and replaces its transactions. Concurrent saves
	/// of the same height and payloads share a single write.
	pub async fn save_block(&self, ctx: &Context, height: Height, txs: Vec<Tx>) -> Result<()> {
		ctx.check().context("save block")?;
		let block_height = i64::try_from(height).map_err(|_| {
			StorageError::Validation(format!("height {} out of range", height)).context("save block")
		})?;
		let key = flight_key(self.id, height, Tx::fingerprint(&txs));
		let rows = validate(txs).map_err(|e| e.context("save block"))?;

		let db = self.db.clone();
		let chain_key = self.id;
		// The shared write runs detached from `ctx`; each caller only stops waiting on it.
		let flight = self.db.flights.run(key, move || async move {
			let background = Context::background();
			db.with_conn(&background, "save block", move |conn| {
				write_block(conn, chain_key, block_height, rows)
			})
			.await
			.map_err(Arc::new)
		});

		match ctx.run(flight).await {
			Ok(Ok(())) => {
				debug!(message = "Block saved", chain = %self.chain_id, height = height);
				Ok(())
			},
			Ok(Err(e)) => Err(StorageError::Shared(e)),
			Err(cancelled) => Err(StorageError::from(cancelled).context("save block")),
		}
	}

	pub fn db(&self) -> &BlockDB {
		&self.db
	}
}

#[async_trait]
impl BlockSaver for Chain {
	type Error = StorageError;

	async fn save_block(&self, ctx: &Context, height: Height, txs: Vec<Tx>) -> Result<()> {
		Chain::save_block(self, ctx, height, txs).await
	}
}

/// Deduplication key for a save. Saves on different chains never share a write.
fn flight_key(chain: ChainKey, height: Height, fingerprint: u64) -> String {
	format!("{}:{}-{:016x}", chain, height, fingerprint)
}

/// Reject payloads that are not UTF-8 JSON documents.
fn validate(txs: Vec<Tx>) -> Result<Vec<TxRow>> {
	txs.into_iter()
		.enumerate()
		.map(|(index, tx)| {
			if !tx.is_json() {
				return Err(StorageError::Validation(format!("tx {} is not valid JSON", index)))
			}
			let data = String::from_utf8(tx.data)
				.map_err(|_| StorageError::Validation(format!("tx {} is not UTF-8", index)))?;
			Ok(TxRow { data, events: tx.events })
		})
		.collect()
}

/// Upsert the block and replace its transactions in one transaction.
fn write_block(
	conn: &mut Connection,
	chain: ChainKey,
	height: i64,
	txs: Vec<TxRow>,
) -> Result<()> {
	let dbtx = conn.transaction_with_behavior(TransactionBehavior::Immediate).context("begin tx")?;

	dbtx.execute(sqlite::DB_UPSERT_BLOCK, params![height, chain, timestamp()])
		.context("upsert block")?;
	let block_id: i64 = dbtx
		.query_row(
			"SELECT id FROM block WHERE height = ?1 AND fk_chain_id = ?2",
			params![height, chain],
			|row| row.get(0),
		)
		.context("select block")?;
	let replaced = dbtx
		.execute("DELETE FROM tx WHERE fk_block_id = ?1", params![block_id])
		.context("delete txs")?;
	if replaced > 0 {
		trace!(message = "Replacing block transactions", block = block_id, replaced = replaced);
	}

	{
		let mut insert_tx = dbtx
			.prepare_cached("INSERT INTO tx(data, fk_block_id) VALUES (?1, ?2)")
			.context("prepare tx insert")?;
		let mut insert_event = dbtx
			.prepare_cached("INSERT INTO tendermint_event(type, fk_tx_id) VALUES (?1, ?2)")
			.context("prepare event insert")?;
		let mut insert_attr = dbtx
			.prepare_cached(
				"INSERT INTO tendermint_event_attr(key, value, fk_event_id) VALUES (?1, ?2, ?3)",
			)
			.context("prepare event attribute insert")?;

		for tx in &txs {
			let tx_id = insert_tx.insert(params![tx.data, block_id]).context("insert tx")?;
			for event in &tx.events {
				let event_id = insert_event
					.insert(params![event.event_type, tx_id])
					.context("insert event")?;
				for attr in &event.attributes {
					insert_attr
						.execute(params![attr.key, attr.value, event_id])
						.context("insert event attribute")?;
				}
			}
		}
	}

	dbtx.commit().context("commit tx")
}
