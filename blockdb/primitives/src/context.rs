use std::future::Future;

use thiserror::Error;
use tokio::sync::watch;

/// Returned when an operation observes a cancelled `Context`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Context cancelled")]
pub struct Cancelled;

/// Cancellation token handed to every public operation.
///
/// Cloning is cheap; all clones observe the same cancellation.
#[derive(Clone, Debug)]
pub struct Context {
	receiver: Option<watch::Receiver<bool>>,
}

/// Cancels the `Context` it was created with.
#[derive(Debug)]
pub struct CancelHandle {
	sender: watch::Sender<bool>,
}

impl Context {
	/// A context that is never cancelled.
	pub fn background() -> Self {
		Self { receiver: None }
	}

	/// A cancellable context and the handle that cancels it.
	pub fn with_cancel() -> (Self, CancelHandle) {
		let (sender, receiver) = watch::channel(false);
		(Self { receiver: Some(receiver) }, CancelHandle { sender })
	}

	pub fn is_cancelled(&self) -> bool {
		match &self.receiver {
			Some(receiver) => *receiver.borrow(),
			None => false,
		}
	}

	/// Fail fast if the context is already cancelled.
	pub fn check(&self) -> Result<(), Cancelled> {
		if self.is_cancelled() {
			return Err(Cancelled)
		}
		Ok(())
	}

	/// Resolves once the context is cancelled. Never resolves for a background context or
	/// once every `CancelHandle` has been dropped without cancelling.
	pub async fn cancelled(&self) {
		let mut receiver = match &self.receiver {
			Some(receiver) => receiver.clone(),
			None => return futures_pending().await,
		};
		loop {
			if *receiver.borrow() {
				return
			}
			if receiver.changed().await.is_err() {
				return futures_pending().await
			}
		}
	}

	/// Drive `future` to completion unless the context is cancelled first.
	pub async fn run<F>(&self, future: F) -> Result<F::Output, Cancelled>
	where
		F: Future,
	{
		self.check()?;
		tokio::select! {
			biased;
			_ = self.cancelled() => Err(Cancelled),
			output = future => Ok(output),
		}
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::background()
	}
}

impl CancelHandle {
	pub fn cancel(&self) {
		let _ = self.sender.send(true);
	}
}

/// A future that never completes.
async fn futures_pending() {
	std::future::pending::<()>().await
}
