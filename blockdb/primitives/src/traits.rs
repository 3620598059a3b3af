use std::sync::Arc;

use thiserror::Error;

use crate::{
	context::{
		Cancelled,
		Context,
	},
	types::{
		Height,
		Tx,
	},
};

#[derive(Error, Debug)]
pub enum TxFinderError {
	#[error("Block `{0}` is not available yet")]
	NotReady(Height),
	#[error(transparent)]
	Cancelled(#[from] Cancelled),
	#[error("Could not find transactions: `{0}`")]
	Other(String),
}

/// Produces the transactions of a chain at a given height.
///
/// An empty vector means the block exists but holds no transactions. Any error means the
/// caller should retry the same height later.
#[async_trait::async_trait]
pub trait TxFinder: Send + Sync {
	async fn find_txs(&self, ctx: &Context, height: Height) -> Result<Vec<Tx>, TxFinderError>;
}

/// Persists a block and its transactions.
#[async_trait::async_trait]
pub trait BlockSaver: Send + Sync {
	type Error: std::error::Error + Send + Sync + 'static;

	async fn save_block(&self, ctx: &Context, height: Height, txs: Vec<Tx>)
		-> Result<(), Self::Error>;
}

#[async_trait::async_trait]
impl<T> TxFinder for Arc<T>
where
	T: TxFinder + ?Sized,
{
	async fn find_txs(&self, ctx: &Context, height: Height) -> Result<Vec<Tx>, TxFinderError> {
		(**self).find_txs(ctx, height).await
	}
}

#[async_trait::async_trait]
impl<T> BlockSaver for Arc<T>
where
	T: BlockSaver + ?Sized,
{
	type Error = T::Error;

	async fn save_block(
		&self,
		ctx: &Context,
		height: Height,
		txs: Vec<Tx>,
	) -> Result<(), Self::Error> {
		(**self).save_block(ctx, height, txs).await
	}
}
