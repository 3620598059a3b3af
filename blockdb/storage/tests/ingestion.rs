use std::sync::Arc;

use blockdb_primitives::{
	config::DatabasePath,
	context::Context,
	types::Tx,
};
use blockdb_storage::BlockDB;

async fn open_migrated(path: impl Into<DatabasePath>) -> BlockDB {
	let db = BlockDB::connect(path).expect("Database should open");
	db.migrate(&Context::background(), "integration").await.expect("Migration should succeed");
	db
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_leave_one_block() {
	let db = open_migrated(DatabasePath::Memory).await;
	let ctx = Context::background();
	let test_case = db.create_test_case(&ctx, "Concurrent", "integration").await.expect("Test case");
	let chain = Arc::new(test_case.add_chain(&ctx, "chain1", "cosmos").await.expect("Chain"));
	let txs: Vec<Tx> = vec![r#"{"tx":"tx1"}"#.into(), r#"{"tx":"tx2"}"#.into()];

	let mut handles = vec![];
	for _ in 0..10 {
		let chain = chain.clone();
		let txs = txs.clone();
		handles.push(tokio::spawn(async move {
			chain.save_block(&Context::background(), 5, txs).await
		}));
	}
	for handle in handles {
		handle.await.expect("Task should not panic").expect("Save should succeed");
	}

	let records = db.transactions(&ctx, chain.id).await.expect("Transactions should load");
	assert_eq!(records.len(), 2);
	assert!(records.iter().all(|record| record.height == 5));
	let summaries = db.recent_test_cases(&ctx, 1).await.expect("Summaries should load");
	assert_eq!(summaries[0].height, 5);
	assert_eq!(summaries[0].tx_total, 2);
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
	let dir = tempfile::tempdir().expect("Temp dir should be created");
	let path = dir.path().join("nested").join("databases").join("block.db");
	let ctx = Context::background();

	let chain_key = {
		let db = open_migrated(path.clone()).await;
		assert!(!db.is_memory());
		assert_eq!(db.path().as_path(), Some(path.as_path()));

		let test_case = db.create_test_case(&ctx, "OnDisk", "integration").await.expect("Test case");
		let chain = test_case.add_chain(&ctx, "disk-chain", "cosmos").await.expect("Chain");
		chain
			.save_block(&ctx, 1, vec![r#"{"tx":"a"}"#.into(), r#"{"tx":"b"}"#.into()])
			.await
			.expect("Save should succeed");
		assert!(path.with_file_name("block.db-wal").exists());
		chain.id
	};

	let db = open_migrated(path.clone()).await;
	let records = db.transactions(&ctx, chain_key).await.expect("Transactions should load");
	let mut payloads: Vec<String> = records.into_iter().map(|record| record.data).collect();
	payloads.sort();
	assert_eq!(payloads, vec![r#"{"tx":"a"}"#.to_owned(), r#"{"tx":"b"}"#.to_owned()]);
}

#[tokio::test]
async fn test_two_handles_share_a_file() {
	let dir = tempfile::tempdir().expect("Temp dir should be created");
	let path = dir.path().join("block.db");
	let ctx = Context::background();

	let first = open_migrated(path.clone()).await;
	let second = open_migrated(path.clone()).await;

	let a = first.create_test_case(&ctx, "A", "integration").await.expect("Test case");
	let b = second.create_test_case(&ctx, "B", "integration").await.expect("Test case");
	let chain_a = a.add_chain(&ctx, "chain-a", "cosmos").await.expect("Chain");
	let chain_b = b.add_chain(&ctx, "chain-b", "cosmos").await.expect("Chain");

	let (saved_a, saved_b) = tokio::join!(
		chain_a.save_block(&ctx, 1, vec![r#"{"from":"a"}"#.into()]),
		chain_b.save_block(&ctx, 1, vec![r#"{"from":"b"}"#.into()]),
	);
	saved_a.expect("Save should succeed");
	saved_b.expect("Save should succeed");

	let summaries = first.recent_test_cases(&ctx, 10).await.expect("Summaries should load");
	assert_eq!(summaries.len(), 2);
	assert!(summaries.iter().all(|summary| summary.height == 1 && summary.tx_total == 1));
}

#[tokio::test]
async fn test_saved_payloads_match_transactions() {
	let db = open_migrated(DatabasePath::Memory).await;
	let ctx = Context::background();
	let test_case = db.create_test_case(&ctx, "Payloads", "integration").await.expect("Test case");
	let chain = test_case.add_chain(&ctx, "chain1", "cosmos").await.expect("Chain");

	let payloads = [r#"{"z":1}"#, r#"{"a":2}"#, r#"{"m":3}"#];
	chain
		.save_block(&ctx, 11, payloads.iter().map(|p| Tx::from(*p)).collect())
		.await
		.expect("Save should succeed");

	let mut stored: Vec<String> = db
		.transactions(&ctx, chain.id)
		.await
		.expect("Transactions should load")
		.into_iter()
		.filter(|record| record.height == 11)
		.map(|record| record.data)
		.collect();
	stored.sort();
	let mut expected: Vec<String> = payloads.iter().map(|p| p.to_string()).collect();
	expected.sort();
	assert_eq!(stored, expected);
}
