#![warn(clippy::missing_docs_in_private_items)]

//! Polls a chain for new blocks and hands them to the block database.

use std::time::Duration;

use blockdb_primitives::{
	config::ConfigError,
	context::Context,
	traits::{
		BlockSaver,
		TxFinder,
		TxFinderError,
	},
	types::Height,
};
use futures::StreamExt;
use thiserror::Error;
use tokio::{
	select,
	task::JoinHandle,
	time::{
		interval,
		MissedTickBehavior,
	},
};
use tokio_stream::wrappers::IntervalStream;
use tracing::{
	debug,
	error,
	info,
	trace,
};


/// Height the collector starts from.
pub const START_HEIGHT: Height = 1;

#[derive(Error, Debug)]
pub enum CollectorError<E>
where
	E: std::error::Error + 'static,
{
	#[error("Could not find txs at height `{0}`: `{1}`")]
	Find(Height, #[source] TxFinderError),
	#[error("Could not save block at height `{0}`: `{1}`")]
	Save(Height, #[source] E),
}

/// Ingests the blocks of one chain in ascending height.
///
/// The height only advances once a block has been saved, so a failed find or save is retried
/// on the next tick and the recorded stream has no gaps.
pub struct Collector<F, S> {
	finder: F,
	saver: S,
	poll_rate: Duration,
	height: Height,
	label: String,
}

impl<F, S> Collector<F, S>
where
	F: TxFinder,
	S: BlockSaver,
{
	/// Fails when `poll_rate` is zero.
	pub fn new(finder: F, saver: S, poll_rate: Duration) -> Result<Self, ConfigError> {
		if poll_rate.is_zero() {
			return Err(ConfigError::ZeroPollRate)
		}
		Ok(Self { finder, saver, poll_rate, height: START_HEIGHT, label: String::new() })
	}

	/// Name attached to the collector's log lines, typically the chain id.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// The next height to collect.
	pub fn height(&self) -> Height {
		self.height
	}

	/// Collect the block at the current height, advancing on success.
	///
	/// Returns the height the next tick will collect.
	pub async fn tick(&mut self, ctx: &Context) -> Result<Height, CollectorError<S::Error>> {
		let height = self.height;
		let txs = self
			.finder
			.find_txs(ctx, height)
			.await
			.map_err(|e| CollectorError::Find(height, e))?;
		let count = txs.len();
		self.saver
			.save_block(ctx, height, txs)
			.await
			.map_err(|e| CollectorError::Save(height, e))?;

		trace!(message = "Block collected", chain = %self.label, height = height, txs = count);
		self.height += 1;
		Ok(self.height)
	}

	/// Poll until `ctx` is cancelled. Errors are logged and the same height is retried.
	pub async fn run(mut self, ctx: Context) {
		let mut ticker = interval(self.poll_rate);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
		let ticks = IntervalStream::new(ticker);
		tokio::pin!(ticks);

		info!(message = "Collector started", chain = %self.label, height = self.height);
		loop {
			select! {
				biased;
				_ = ctx.cancelled() => break,
				Some(_) = ticks.next() => {
					if let Err(e) = self.tick(&ctx).await {
						if ctx.is_cancelled() {
							break
						}
						error!(
							message = "Collector tick failed",
							chain = %self.label,
							height = self.height,
							error = %e
						);
					}
				}
			}
		}
		debug!(message = "Collector stopped", chain = %self.label, height = self.height);
	}
}

impl<F, S> Collector<F, S>
where
	F: TxFinder + 'static,
	S: BlockSaver + 'static,
{
	/// Run the collector on the current runtime.
	pub fn spawn(self, ctx: Context) -> JoinHandle<()> {
		tokio::spawn(self.run(ctx))
	}
}
