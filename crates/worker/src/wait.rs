use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Idle hook invoked by a polling loop each time it finds no work.
///
/// Implementations only influence scheduling. They may be called arbitrarily often and
/// must never be relied on for correctness.
pub trait WaitStrategy: Send + Sync + 'static {
	/// Called once per idle iteration.
	fn on_wait(&self);
}

impl<F> WaitStrategy for F
where
	F: Fn() + Send + Sync + 'static,
{
	fn on_wait(&self) {
		self()
	}
}

/// Built-in idle policies, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitPolicy {
	/// Do nothing and poll again immediately.
	#[default]
	None,
	/// Give the processor back to the OS scheduler.
	///
	/// Favors global throughput over the polling thread's latency.
	Yield,
	/// Busy-wait with a CPU spin hint.
	///
	/// Favors the polling thread's latency over system-wide throughput.
	Spin,
	/// Park the thread for at most a fixed interval.
	///
	/// An `unpark` of the waiting thread ends the wait early, as may a spurious wakeup.
	Sleep {
		/// Interval in microseconds.
		micros: u64,
	},
}

impl WaitStrategy for WaitPolicy {
	#[inline]
	fn on_wait(&self) {
		match *self {
			Self::None => {}
			Self::Yield => std::thread::yield_now(),
			Self::Spin => std::hint::spin_loop(),
			Self::Sleep { micros } => std::thread::park_timeout(Duration::from_micros(micros)),
		}
	}
}
