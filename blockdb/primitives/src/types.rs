use serde::{
	Deserialize,
	Serialize,
};
use xxhash_rust::xxh3::Xxh3;

/// Block height of a chain under test.
pub type Height = u64;

/// Primary key of a row in the `chain` table.
pub type ChainKey = i64;

/// Primary key of a row in the `test_case` table.
pub type TestCaseId = i64;

/// Chain type recorded when the caller does not provide one.
pub const DEFAULT_CHAIN_TYPE: &str = "unknown";

/// A single `(key, value)` attribute of a tendermint event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEventAttr {
	pub key: String,
	pub value: String,
}

impl TxEventAttr {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self { key: key.into(), value: value.into() }
	}
}

/// Event emitted while executing a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
	#[serde(rename = "type")]
	pub event_type: String,
	#[serde(default)]
	pub attributes: Vec<TxEventAttr>,
}

impl TxEvent {
	pub fn new(event_type: impl Into<String>, attributes: Vec<TxEventAttr>) -> Self {
		Self { event_type: event_type.into(), attributes }
	}
}

/// A transaction as produced by a chain's `TxFinder`.
///
/// `data` is opaque to the finder but must be a JSON document by the time it reaches the
/// block database. Events are only present for chains that expose them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
	pub data: Vec<u8>,
	#[serde(default)]
	pub events: Vec<TxEvent>,
}

impl Tx {
	/// Create a transaction without events.
	pub fn new(data: impl Into<Vec<u8>>) -> Self {
		Self { data: data.into(), events: vec![] }
	}

	/// Attach events to the transaction.
	pub fn with_events(mut self, events: Vec<TxEvent>) -> Self {
		self.events = events;
		self
	}

	/// Whether the payload parses as JSON.
	pub fn is_json(&self) -> bool {
		serde_json::from_slice::<serde::de::IgnoredAny>(&self.data).is_ok()
	}

	/// Digest of the payloads of `txs`, each prefixed with its length so that splitting the
	/// same bytes differently yields a different digest.
	///
	/// Not cryptographic: only used to recognise identical in-flight saves.
	pub fn fingerprint(txs: &[Tx]) -> u64 {
		let mut hasher = Xxh3::new();
		for tx in txs {
			hasher.update(&(tx.data.len() as u64).to_le_bytes());
			hasher.update(&tx.data);
		}
		hasher.digest()
	}
}

impl From<&str> for Tx {
	fn from(data: &str) -> Self {
		Tx::new(data.as_bytes().to_vec())
	}
}

impl From<String> for Tx {
	fn from(data: String) -> Self {
		Tx::new(data.into_bytes())
	}
}

impl From<serde_json::Value> for Tx {
	fn from(value: serde_json::Value) -> Self {
		Tx::new(value.to_string().into_bytes())
	}
}
