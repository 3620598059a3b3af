use blockdb_primitives::types::{
	ChainKey,
	Height,
	TestCaseId,
};
use chrono::{
	DateTime,
	Local,
};
use serde::Serialize;

/// Latest schema stamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaVersion {
	pub source_revision: String,
	pub created_at: DateTime<Local>,
}

/// One `(test case, chain)` row of the recent test cases listing.
///
/// Chain columns are `None` for a test case that never registered a chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestCaseSummary {
	pub id: TestCaseId,
	pub created_at: DateTime<Local>,
	pub name: String,
	pub source_revision: String,
	pub chain_key: Option<ChainKey>,
	pub chain_id: Option<String>,
	pub chain_type: Option<String>,
	pub height: Height,
	pub tx_total: u64,
}

/// A message unnested from a Cosmos transaction body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CosmosMessage {
	pub height: Height,
	pub tx_id: i64,
	pub msg_n: i64,
	pub msg_type: Option<String>,
	pub client_chain_id: Option<String>,
	pub client_id: Option<String>,
	pub counterparty_client_id: Option<String>,
	pub conn_id: Option<String>,
	pub counterparty_conn_id: Option<String>,
	pub port_id: Option<String>,
	pub counterparty_port_id: Option<String>,
	pub channel_id: Option<String>,
	pub counterparty_channel_id: Option<String>,
	pub raw: String,
}

/// A stored transaction with the height of its block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TxRecord {
	pub height: Height,
	pub tx_id: i64,
	pub data: String,
}
