use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use seatline_primitives::{ClientGroup, Table};
use seatline_worker::WaitStrategy;

use crate::backend::{Admission, SeatingBackend};
use crate::dispatch::{Dispatcher, DispatcherState};
use crate::{EngineConfig, SeatSlots, SeatingError, SlotView, WaitingQueue};

/// State shared between caller threads and the dispatcher thread.
pub(crate) struct Shared {
	pub(crate) slots: SeatSlots,
	pub(crate) queue: WaitingQueue,
	pub(crate) wait: Box<dyn WaitStrategy>,
}

/// Seat-assignment engine built from CAS-published slot snapshots and a lock-free queue.
///
/// All operations take `&self` and may be called from any number of threads. The first
/// arrival starts the background dispatcher; dropping the engine stops it.
pub struct LockFreeEngine {
	shared: Arc<Shared>,
	dispatcher: Dispatcher,
}

impl LockFreeEngine {
	/// Creates an engine over `tables` whose dispatcher idles with `wait`.
	pub fn new(tables: impl IntoIterator<Item = Table>, wait: impl WaitStrategy) -> Self {
		let slots = SeatSlots::new(tables);
		tracing::debug!(tables = slots.len(), seats = slots.capacity(), "engine.new");
		Self {
			shared: Arc::new(Shared {
				slots,
				queue: WaitingQueue::new(),
				wait: Box::new(wait),
			}),
			dispatcher: Dispatcher::new(),
		}
	}

	/// Creates an engine from a loaded configuration.
	pub fn from_config(config: &EngineConfig) -> Self {
		Self::new(config.tables.iter().copied(), config.wait)
	}

	/// Tables in construction order.
	pub fn tables(&self) -> Vec<Table> {
		self.shared.slots.tables()
	}

	/// Owned copies of every table's occupancy.
	pub fn slot_views(&self) -> Vec<SlotView> {
		self.shared.slots.views()
	}

	/// Waiting groups in arrival order.
	pub fn queued_groups(&self) -> Vec<ClientGroup> {
		self.shared.queue.snapshot()
	}

	/// Returns whether the dispatcher has been started.
	pub fn dispatcher_state(&self) -> DispatcherState {
		self.dispatcher.state()
	}
}

impl SeatingBackend for LockFreeEngine {
	fn on_arrive(&self, group: ClientGroup) -> Result<Admission, SeatingError> {
		self.dispatcher.ensure_started(&self.shared)?;

		// Never overtake a waiting group that could use the same seats.
		if self.shared.queue.has_waiting_at_most(group.size()) {
			self.shared.queue.enqueue(group);
			return Ok(Admission::Queued);
		}

		match self.shared.slots.try_seat(&group) {
			Some(table) => Ok(Admission::Seated(table)),
			None => {
				self.shared.queue.enqueue(group);
				Ok(Admission::Queued)
			}
		}
	}

	fn on_leave(&self, group: &ClientGroup) -> Result<Table, SeatingError> {
		self.shared.slots.release(group).inspect_err(|_| {
			tracing::warn!(size = group.size(), "engine.leave_unseated");
		})
	}

	fn lookup(&self, group: &ClientGroup) -> Option<Table> {
		self.shared.slots.lookup(group)
	}

	fn abandon_queue(&self, group: &ClientGroup) -> bool {
		self.shared.queue.remove(group)
	}

	fn abandon_queue_if(&self, group: &ClientGroup, wait_limit: Duration) -> bool {
		self.shared.queue.remove_if_older(group, wait_limit)
	}

	fn abandon_all_if(&self, wait_limit: Duration) -> bool {
		let removed = self.shared.queue.remove_all_older(wait_limit);
		if removed {
			tracing::debug!(?wait_limit, waiting = self.shared.queue.len(), "engine.expire");
		}
		removed
	}

	fn queue_count(&self) -> usize {
		self.shared.queue.len()
	}

	fn seated_count(&self) -> usize {
		self.shared.slots.occupied_seats()
	}
}

impl fmt::Debug for LockFreeEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LockFreeEngine")
			.field("slots", &self.shared.slots)
			.field("queue", &self.shared.queue)
			.field("dispatcher", &self.dispatcher.state())
			.finish_non_exhaustive()
	}
}
