use std::{
	collections::HashMap,
	fmt,
	future::Future,
	sync::Arc,
};

use futures::future::{
	BoxFuture,
	FutureExt,
	Shared,
};
use parking_lot::Mutex;

/// A call in flight, tagged so a finished call only evicts itself.
struct Call<T> {
	generation: u64,
	future: Shared<BoxFuture<'static, T>>,
}

/// Bookkeeping shared between the group and its running calls.
struct Calls<T> {
	next_generation: u64,
	by_key: HashMap<String, Call<T>>,
}

/// Collapses concurrent calls with the same key into one execution whose output is handed to
/// every caller.
///
/// Each execution is driven to completion on the runtime, so a call whose callers all stop
/// waiting still finishes and leaves the group.
pub struct SingleFlight<T> {
	calls: Arc<Mutex<Calls<T>>>,
}

impl<T> SingleFlight<T>
where
	T: Clone + Send + Sync + 'static,
{
	pub fn new() -> Self {
		Self { calls: Arc::new(Mutex::new(Calls { next_generation: 0, by_key: HashMap::new() })) }
	}

	/// Run `work` unless a call with the same key is already in flight, in which case wait
	/// for that call's output instead. Must be called within a tokio runtime.
	pub async fn run<F, Fut>(&self, key: impl Into<String>, work: F) -> T
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = T> + Send + 'static,
	{
		let key = key.into();
		let future = {
			let mut calls = self.calls.lock();
			match calls.by_key.get(&key) {
				Some(call) => call.future.clone(),
				None => {
					let generation = calls.next_generation;
					calls.next_generation += 1;

					let registry = Arc::clone(&self.calls);
					let call_key = key.clone();
					let work = work();
					let future = async move {
						let output = work.await;
						let mut calls = registry.lock();
						if calls.by_key.get(&call_key).map(|c| c.generation) == Some(generation) {
							calls.by_key.remove(&call_key);
						}
						output
					}
					.boxed()
					.shared();

					calls.by_key.insert(key, Call { generation, future: future.clone() });
					tokio::spawn(future.clone());
					future
				},
			}
		};
		future.await
	}

	/// Number of distinct keys currently in flight.
	pub fn in_flight(&self) -> usize {
		self.calls.lock().by_key.len()
	}
}

impl<T> fmt::Debug for SingleFlight<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SingleFlight").field("in_flight", &self.calls.lock().by_key.len()).finish()
	}
}

impl<T> Default for SingleFlight<T>
where
	T: Clone + Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::atomic::{
			AtomicUsize,
			Ordering,
		},
		time::Duration,
	};

	use super::*;

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_calls_share_one_execution() {
		let group = Arc::new(SingleFlight::<usize>::new());
		let executions = Arc::new(AtomicUsize::new(0));

		let mut handles = vec![];
		for _ in 0..10 {
			let group = group.clone();
			let executions = executions.clone();
			handles.push(tokio::spawn(async move {
				group
					.run("5-abc", move || async move {
						tokio::time::sleep(Duration::from_millis(50)).await;
						executions.fetch_add(1, Ordering::SeqCst) + 1
					})
					.await
			}));
		}

		for handle in handles {
			assert_eq!(handle.await.expect("Task should not panic"), 1);
		}
		assert_eq!(executions.load(Ordering::SeqCst), 1);
		assert_eq!(group.in_flight(), 0);
	}

	#[tokio::test]
	async fn test_sequential_calls_run_again() {
		let group = SingleFlight::<u32>::new();
		assert_eq!(group.run("1-a", || async { 1 }).await, 1);
		assert_eq!(group.run("1-a", || async { 2 }).await, 2);
		assert_eq!(group.in_flight(), 0);
	}

	#[tokio::test]
	async fn test_abandoned_call_completes_and_leaves() {
		let group = Arc::new(SingleFlight::<u32>::new());
		let executions = Arc::new(AtomicUsize::new(0));
		let (release, released) = tokio::sync::oneshot::channel::<()>();

		let waiter = {
			let group = group.clone();
			let executions = executions.clone();
			tokio::spawn(async move {
				group
					.run("1-a", move || async move {
						let _ = released.await;
						executions.fetch_add(1, Ordering::SeqCst);
						1
					})
					.await
			})
		};
		while group.in_flight() == 0 {
			tokio::task::yield_now().await;
		}
		waiter.abort();
		assert!(waiter.await.is_err());

		release.send(()).expect("Abandoned call should still be waiting");
		for _ in 0..100 {
			if group.in_flight() == 0 {
				break
			}
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
		assert_eq!(group.in_flight(), 0);
		assert_eq!(executions.load(Ordering::SeqCst), 1);
		assert_eq!(group.run("1-a", || async { 2 }).await, 2);
	}

	#[tokio::test]
	async fn test_distinct_keys_do_not_collapse() {
		let group = SingleFlight::<&'static str>::new();
		let (first, second) =
			tokio::join!(group.run("1-a", || async { "first" }), group.run("2-a", || async {
				"second"
			}));
		assert_eq!(first, "first");
		assert_eq!(second, "second");
	}
}
