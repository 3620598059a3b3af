use blockdb_primitives::{
	context::Context,
	types::{
		TestCaseId,
		DEFAULT_CHAIN_TYPE,
	},
};
use chrono::{
	DateTime,
	Utc,
};
use rusqlite::params;
use tracing::debug;

use crate::{
	chain::Chain,
	errors::{
		Result,
		ResultExt,
	},
	BlockDB,
};

/// A single invocation of an integration test, to which chains attach.
#[derive(Clone, Debug)]
pub struct TestCase {
	pub id: TestCaseId,
	pub name: String,
	pub source_revision: String,
	pub created_at: DateTime<Utc>,
	db: BlockDB,
}

impl BlockDB {
	/// Record the start of a test invocation.
	pub async fn create_test_case(
		&self,
		ctx: &Context,
		name: &str,
		source_revision: &str,
	) -> Result<TestCase> {
		let created_at = Utc::now();
		let stamp = created_at.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true);
		let (row_name, row_revision) = (name.to_owned(), source_revision.to_owned());
		let id = self
			.with_conn(ctx, "create test case", move |conn| {
				conn.execute(
					"INSERT INTO test_case(name, git_sha, created_at) VALUES (?1, ?2, ?3)",
					params![row_name, row_revision, stamp],
				)
				.context("insert test case")?;
				Ok(conn.last_insert_rowid())
			})
			.await?;

		debug!(message = "Test case created", id = id, name = name);
		Ok(TestCase {
			id,
			name: name.to_owned(),
			source_revision: source_revision.to_owned(),
			created_at,
			db: self.clone(),
		})
	}
}

impl TestCase {
	/// Register a chain under this test case.
	///
	/// An empty `chain_type` is recorded as `unknown`. Registering the same `chain_id` twice
	/// fails with a unique constraint error.
	pub async fn add_chain(&self, ctx: &Context, chain_id: &str, chain_type: &str) -> Result<Chain> {
		let chain_type =
			if chain_type.trim().is_empty() { DEFAULT_CHAIN_TYPE } else { chain_type }.to_owned();
		let (row_chain_id, row_chain_type, test_case_id) =
			(chain_id.to_owned(), chain_type.clone(), self.id);
		let id = self
			.db
			.with_conn(ctx, "add chain", move |conn| {
				conn.execute(
					"INSERT INTO chain(chain_id, chain_type, fk_test_id) VALUES (?1, ?2, ?3)",
					params![row_chain_id, row_chain_type, test_case_id],
				)
				.context("insert chain")?;
				Ok(conn.last_insert_rowid())
			})
			.await?;

		debug!(message = "Chain added", id = id, chain_id = chain_id, test_case = self.id);
		Ok(Chain::new(self.db.clone(), id, chain_id.to_owned(), chain_type, self.id))
	}

	/// The database this test case was recorded in.
	pub fn db(&self) -> &BlockDB {
		&self.db
	}
}

impl From<TestCase> for TestCaseId {
	fn from(test_case: TestCase) -> Self {
		test_case.id
	}
}
