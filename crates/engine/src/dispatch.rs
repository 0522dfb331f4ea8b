//! Background loop that matches waiting groups to freed capacity.
//!
//! The loop is started lazily by the first arrival and then runs for the rest of the
//! engine's lifetime. Dropping the engine cancels it, wakes the thread if it is parked in
//! [`WaitPolicy::Sleep`](seatline_worker::WaitPolicy::Sleep), and joins it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;

use tokio_util::sync::CancellationToken;

use crate::SeatingError;
use crate::engine::Shared;

/// Name of the dispatcher OS thread.
pub const DISPATCH_THREAD_NAME: &str = "seatline-dispatch";

/// Lifecycle of the dispatcher loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
	/// No arrival has been recorded yet.
	NotStarted,
	/// The loop is polling the waiting queue.
	Running,
}

pub(crate) struct Dispatcher {
	started: AtomicBool,
	handle: OnceLock<JoinHandle<()>>,
	cancel: CancellationToken,
}

impl Dispatcher {
	pub(crate) fn new() -> Self {
		Self {
			started: AtomicBool::new(false),
			handle: OnceLock::new(),
			cancel: CancellationToken::new(),
		}
	}

	pub(crate) fn state(&self) -> DispatcherState {
		if self.started.load(Ordering::Acquire) {
			DispatcherState::Running
		} else {
			DispatcherState::NotStarted
		}
	}

	/// Starts the loop unless another caller already has.
	///
	/// Exactly one racing caller wins the flag and spawns the thread. If spawning fails the
	/// flag is cleared so a later arrival can try again.
	pub(crate) fn ensure_started(&self, shared: &Arc<Shared>) -> Result<(), SeatingError> {
		if self.started.load(Ordering::Acquire) || self.started.swap(true, Ordering::AcqRel) {
			return Ok(());
		}

		let shared = Arc::clone(shared);
		let cancel = self.cancel.clone();
		match seatline_worker::spawn_worker_thread(DISPATCH_THREAD_NAME, move || run(&shared, &cancel)) {
			Ok(handle) => {
				let _ = self.handle.set(handle);
				tracing::debug!("dispatch.start");
				Ok(())
			}
			Err(error) => {
				self.started.store(false, Ordering::Release);
				tracing::warn!(%error, "dispatch.spawn_failed");
				Err(SeatingError::DispatcherSpawn(error))
			}
		}
	}
}

impl Drop for Dispatcher {
	fn drop(&mut self) {
		self.cancel.cancel();
		if let Some(handle) = self.handle.take() {
			handle.thread().unpark();
			if handle.join().is_err() {
				tracing::warn!("dispatch.panicked");
			}
		}
	}
}

/// Polls the queue until cancelled, seating whatever currently fits.
///
/// The wait strategy runs whenever the queue is empty and after a pass that seated nobody.
fn run(shared: &Shared, cancel: &CancellationToken) {
	while !cancel.is_cancelled() {
		if shared.queue.is_empty() {
			shared.wait.on_wait();
			continue;
		}

		let seated = drain_pass(shared);
		if seated == 0 {
			shared.wait.on_wait();
		} else {
			tracing::trace!(seated, waiting = shared.queue.len(), "dispatch.drain");
		}
	}
	tracing::debug!("dispatch.stop");
}

/// One pass over the queue in arrival order.
///
/// Once a group fails to find a seat, later groups at least as large are skipped for the rest
/// of the pass, so seats freed mid-pass cannot go to them ahead of the earlier group. A group
/// abandoned while it was being seated gets its seats released again.
fn drain_pass(shared: &Shared) -> usize {
	let mut blocked_from = u8::MAX;
	shared.queue.drain_where(
		|group| {
			// Skipped groups get another try next pass; seating them now could overtake the failed one.
			if group.size() >= blocked_from {
				return false;
			}
			let seated = shared.slots.try_seat(group).is_some();
			if !seated {
				blocked_from = group.size();
			}
			seated
		},
		|group| match shared.slots.release(group) {
			Ok(table) => tracing::trace!(size = group.size(), %table, "dispatch.revoke"),
			Err(error) => tracing::warn!(%error, "dispatch.revoke_failed"),
		},
	)
}
