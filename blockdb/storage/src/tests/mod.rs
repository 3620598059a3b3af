use blockdb_primitives::context::Context;

use crate::{
	BlockDB,
	Chain,
	TestCase,
};


/// Revision stamped by `migrated_db`.
pub(crate) const REVISION: &str = "abc123";

pub(crate) async fn migrated_db() -> BlockDB {
	let db = BlockDB::connect_in_memory().expect("In-memory database should open");
	db.migrate(&Context::background(), REVISION).await.expect("Migration should succeed");
	db
}

pub(crate) async fn test_case_with_chain(
	db: &BlockDB,
	chain_id: &str,
	chain_type: &str,
) -> (TestCase, Chain) {
	let ctx = Context::background();
	let test_case = db
		.create_test_case(&ctx, "SomeTest", REVISION)
		.await
		.expect("Test case should be created");
	let chain =
		test_case.add_chain(&ctx, chain_id, chain_type).await.expect("Chain should be added");
	(test_case, chain)
}

/// Run a scalar count query directly against the connection.
pub(crate) fn count(db: &BlockDB, sql: &str) -> i64 {
	let conn = db.conn.lock().expect("Connection lock should not be poisoned");
	conn.query_row(sql, [], |row| row.get(0)).expect("Count query should succeed")
}
