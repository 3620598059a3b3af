use std::future::Future;

use blockdb_primitives::{
	context::Context,
	types::ChainKey,
};
use blockdb_storage::{
	BlockDB,
	CosmosMessage,
	Result,
	SchemaVersion,
	TestCaseSummary,
	TxRecord,
};
use tokio::runtime::Handle;

/// Blocking access to the query service from the UI thread.
#[derive(Clone)]
pub struct Loader {
	db: BlockDB,
	runtime: Handle,
	limit: u32,
}

impl Loader {
	pub fn new(db: BlockDB, runtime: Handle, limit: u32) -> Self {
		Self { db, runtime, limit }
	}

	pub fn db(&self) -> &BlockDB {
		&self.db
	}

	pub fn schema_version(&self) -> Result<SchemaVersion> {
		self.block_on(|db, ctx| async move { db.current_schema_version(&ctx).await })
	}

	pub fn test_cases(&self) -> Result<Vec<TestCaseSummary>> {
		let limit = self.limit;
		self.block_on(|db, ctx| async move { db.recent_test_cases(&ctx, limit).await })
	}

	pub fn cosmos_messages(&self, chain: ChainKey) -> Result<Vec<CosmosMessage>> {
		self.block_on(|db, ctx| async move { db.cosmos_messages(&ctx, chain).await })
	}

	pub fn transactions(&self, chain: ChainKey) -> Result<Vec<TxRecord>> {
		self.block_on(|db, ctx| async move { db.transactions(&ctx, chain).await })
	}

	/// Run a query to completion. Must not be called from inside the runtime.
	fn block_on<T, F, Fut>(&self, query: F) -> Result<T>
	where
		F: FnOnce(BlockDB, Context) -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		self.runtime.block_on(query(self.db.clone(), Context::background()))
	}
}
