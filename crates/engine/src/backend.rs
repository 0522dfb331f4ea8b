use std::time::Duration;

use seatline_primitives::{ClientGroup, Table};

use crate::SeatingError;

/// Outcome of an arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
	/// The group was seated immediately at this table.
	Seated(Table),
	/// The group joined the waiting queue.
	Queued,
}

/// Operations every seating backend offers to client threads.
///
/// Implementations must be safe to call concurrently from any number of threads.
pub trait SeatingBackend: Send + Sync {
	/// Records an arrival: seats the group or puts it in the waiting queue.
	fn on_arrive(&self, group: ClientGroup) -> Result<Admission, SeatingError>;

	/// Records the departure of a seated group and frees its seats.
	fn on_leave(&self, group: &ClientGroup) -> Result<Table, SeatingError>;

	/// Table where `group` is seated, or `None` if it is waiting or gone.
	fn lookup(&self, group: &ClientGroup) -> Option<Table>;

	/// Removes `group` from the waiting queue. Returns true if it was waiting.
	fn abandon_queue(&self, group: &ClientGroup) -> bool;

	/// Removes `group` from the waiting queue if it has waited longer than `wait_limit`.
	fn abandon_queue_if(&self, group: &ClientGroup, wait_limit: Duration) -> bool;

	/// Removes every waiting group that has waited longer than `wait_limit`.
	fn abandon_all_if(&self, wait_limit: Duration) -> bool;

	/// Number of waiting groups.
	fn queue_count(&self) -> usize;

	/// Number of occupied seats.
	fn seated_count(&self) -> usize;
}
