use blockdb_primitives::context::Context;
use blockdb_storage::{
	BlockDB,
	StorageError,
};
use tokio::runtime::Runtime;

use crate::tui::Loader;

mod app;
mod search;

/// A populated in-memory database and the runtime it is queried on.
pub(crate) struct Fixture {
	pub runtime: Runtime,
	pub db: BlockDB,
}

impl Fixture {
	/// Two test cases: `SomeTest` with chain `chain1`, then `Empty` without chains.
	pub fn new() -> Self {
		let runtime = tokio::runtime::Builder::new_multi_thread()
			.worker_threads(1)
			.enable_all()
			.build()
			.expect("Runtime should build");
		let db = BlockDB::connect_in_memory().expect("In-memory database should open");
		let ctx = Context::background();
		runtime
			.block_on(async {
				db.migrate(&ctx, "abc123").await?;
				let test_case = db.create_test_case(&ctx, "SomeTest", "abc123").await?;
				let chain = test_case.add_chain(&ctx, "chain1", "cosmos").await?;
				chain
					.save_block(&ctx, 1, vec![
						r#"{"body":{"messages":[{"@type":"/ibc.core.client.v1.MsgCreateClient","client_state":{"chain_id":"other-chain"}}]}}"#.into(),
					])
					.await?;
				chain.save_block(&ctx, 2, vec![r#"{"tx":"tx2.0"}"#.into()]).await?;
				db.create_test_case(&ctx, "Empty", "abc123").await?;
				Ok::<_, StorageError>(())
			})
			.expect("Fixture data should be written");
		Self { runtime, db }
	}

	pub fn loader(&self) -> Loader {
		Loader::new(self.db.clone(), self.runtime.handle().clone(), 100)
	}
}
