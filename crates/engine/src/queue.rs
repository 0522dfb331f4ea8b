//! Lock-free FIFO of client groups waiting for a seat.
//!
//! The queue is a copy-on-write `Vec` behind an [`ArcSwap`]; every structural change is
//! published with a CAS retry loop. Each entry also carries an atomic claim state so that a
//! group is removed exactly once even when the dispatcher and an abandoning caller race:
//!
//! ```text
//! Queued --claim--> Claimed --seated--> Gone
//!    |                 |
//!    |                 +--not seated--> Queued
//!    |                 +--abandoned---> Cancelled --settled--> Gone
//!    +--abandoned--> Gone
//! ```
//!
//! Abandonment never waits for a claim. It marks the claimed entry `Cancelled` and returns;
//! the claim holder sees the mark when it settles and undoes whatever it did for the group.
//! Entries that are not `Queued` or `Claimed` are unlinked right after retirement; until then
//! every reader skips them.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use seatline_primitives::ClientGroup;

const QUEUED: u8 = 0;
const CLAIMED: u8 = 1;
const CANCELLED: u8 = 2;
const GONE: u8 = 3;

#[derive(Debug)]
struct Entry {
	group: ClientGroup,
	state: AtomicU8,
}

impl Entry {
	fn new(group: ClientGroup) -> Self {
		Self {
			group,
			state: AtomicU8::new(QUEUED),
		}
	}

	fn is_live(&self) -> bool {
		matches!(self.state.load(Ordering::Acquire), QUEUED | CLAIMED)
	}

	fn claim(&self) -> bool {
		self.state
			.compare_exchange(QUEUED, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}

	/// Ends a claim. Returns false if the entry was abandoned while claimed.
	fn settle_claim(&self, seated: bool) -> bool {
		let next = if seated { GONE } else { QUEUED };
		match self
			.state
			.compare_exchange(CLAIMED, next, Ordering::AcqRel, Ordering::Acquire)
		{
			Ok(_) => true,
			Err(_) => {
				self.state.store(GONE, Ordering::Release);
				false
			}
		}
	}

	/// Retires a live entry without waiting for an in-flight claim.
	///
	/// Returns false if the entry was already retired, including when the claim holder seated it.
	fn retire(&self) -> bool {
		let mut current = self.state.load(Ordering::Acquire);
		loop {
			let next = match current {
				QUEUED => GONE,
				CLAIMED => CANCELLED,
				_ => return false,
			};
			match self
				.state
				.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
			{
				Ok(_) => return true,
				Err(actual) => current = actual,
			}
		}
	}
}

/// Multi-producer, multi-consumer waiting queue in arrival order.
pub struct WaitingQueue {
	entries: ArcSwap<Vec<Arc<Entry>>>,
}

impl Default for WaitingQueue {
	fn default() -> Self {
		Self::new()
	}
}

impl WaitingQueue {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self {
			entries: ArcSwap::from_pointee(Vec::new()),
		}
	}

	/// Applies `f` to the latest entry list and publishes its result until the CAS lands.
	///
	/// `f` returning `None` means there is nothing to change.
	fn update(&self, mut f: impl FnMut(&[Arc<Entry>]) -> Option<Vec<Arc<Entry>>>) {
		loop {
			let old = self.entries.load_full();
			let Some(next) = f(&old) else {
				return;
			};
			let prev = self.entries.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				return;
			}
		}
	}

	/// Unlinks every retired entry.
	fn compact(&self) {
		self.update(|entries| {
			entries
				.iter()
				.any(|e| !e.is_live())
				.then(|| entries.iter().filter(|e| e.is_live()).cloned().collect())
		});
	}

	/// Appends `group` at the tail.
	pub fn enqueue(&self, group: ClientGroup) {
		let entry = Arc::new(Entry::new(group));
		self.update(|entries| {
			let mut next = Vec::with_capacity(entries.len() + 1);
			next.extend_from_slice(entries);
			next.push(Arc::clone(&entry));
			Some(next)
		});
		tracing::trace!(size = group.size(), "queue.enqueue");
	}

	/// Returns true if any waiting group has at most `size` people.
	pub fn has_waiting_at_most(&self, size: u8) -> bool {
		self.entries
			.load()
			.iter()
			.any(|e| e.is_live() && e.group.size() <= size)
	}

	/// Offers every waiting group to `admit` once, in queue order, removing those it accepts.
	///
	/// Each entry is claimed for the duration of its `admit` call. A group abandoned during
	/// its claim stays abandoned: if `admit` had accepted it, `revoke` is called so the caller
	/// can take the acceptance back. Returns the number of accepted groups that stayed accepted.
	pub fn drain_where(
		&self,
		mut admit: impl FnMut(&ClientGroup) -> bool,
		mut revoke: impl FnMut(&ClientGroup),
	) -> usize {
		let snapshot = self.entries.load_full();
		let mut drained = 0;
		let mut unlinked = false;
		for entry in snapshot.iter() {
			if !entry.claim() {
				continue;
			}
			let accepted = admit(&entry.group);
			if entry.settle_claim(accepted) {
				drained += usize::from(accepted);
				unlinked |= accepted;
			} else {
				if accepted {
					revoke(&entry.group);
				}
				unlinked = true;
			}
		}
		if unlinked {
			self.compact();
		}
		drained
	}

	fn retire_where(&self, matches: impl Fn(&ClientGroup) -> bool, first_only: bool) -> bool {
		let snapshot = self.entries.load_full();
		let mut removed = false;
		for entry in snapshot.iter().filter(|e| matches(&e.group)) {
			if entry.retire() {
				removed = true;
				if first_only {
					break;
				}
			}
		}
		if removed {
			self.compact();
		}
		removed
	}

	/// Removes the first waiting entry equal to `group`.
	pub fn remove(&self, group: &ClientGroup) -> bool {
		self.retire_where(|g| g == group, true)
	}

	/// Removes the first waiting entry equal to `group` iff it has waited longer than `limit`.
	pub fn remove_if_older(&self, group: &ClientGroup, limit: Duration) -> bool {
		let now = Instant::now();
		self.retire_where(|g| g == group && g.waited_longer_than(limit, now), true)
	}

	/// Removes every waiting entry that has waited longer than `limit`.
	pub fn remove_all_older(&self, limit: Duration) -> bool {
		let now = Instant::now();
		self.retire_where(|g| g.waited_longer_than(limit, now), false)
	}

	/// Returns true if `group` is waiting.
	pub fn contains(&self, group: &ClientGroup) -> bool {
		self.entries
			.load()
			.iter()
			.any(|e| e.is_live() && e.group == *group)
	}

	/// Number of waiting groups. Approximate while other threads mutate the queue.
	pub fn len(&self) -> usize {
		self.entries.load().iter().filter(|e| e.is_live()).count()
	}

	/// Returns true if no group is waiting.
	pub fn is_empty(&self) -> bool {
		!self.entries.load().iter().any(|e| e.is_live())
	}

	/// Waiting groups in arrival order.
	pub fn snapshot(&self) -> Vec<ClientGroup> {
		self.entries
			.load()
			.iter()
			.filter(|e| e.is_live())
			.map(|e| e.group)
			.collect()
	}
}

impl std::fmt::Debug for WaitingQueue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.snapshot()).finish()
	}
}
