//! Per-table occupancy published as atomically swappable snapshots.
//!
//! # Mental model
//!
//! * Every physical table owns one [`ArcSwap`] cell holding an immutable [`SeatSlot`].
//! * Readers load the current `Arc` and inspect it without coordination.
//! * Writers derive a replacement from the snapshot they observed and publish it with CAS.
//!   A failed CAS means another thread changed that table first, and the writer starts over
//!   from a fresh search rather than retrying the stale candidate.
//!
//! # Invariants
//!
//! * `free + sum(occupant sizes) == capacity` for every published snapshot.
//! * A group is appended only to a slot whose observed `free` covers it, so `free` never
//!   underflows.
//! * The CAS compares `Arc` pointers while the writer still holds the observed `Arc`, so the
//!   allocation cannot be recycled underneath it (no ABA).

use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;
use seatline_primitives::{ClientGroup, Table};
use smallvec::SmallVec;

use crate::SeatingError;

type Occupants = SmallVec<[ClientGroup; 4]>;

/// Immutable occupancy snapshot of one table.
#[derive(Debug, Clone)]
pub(crate) struct SeatSlot {
	table: Table,
	occupants: Occupants,
	free: u8,
}

impl SeatSlot {
	fn vacant(table: Table) -> Self {
		Self {
			table,
			occupants: Occupants::new(),
			free: table.capacity(),
		}
	}

	fn is_fully_free(&self) -> bool {
		self.free == self.table.capacity()
	}

	fn fits(&self, group: &ClientGroup) -> bool {
		self.free >= group.size()
	}

	fn holds(&self, group: &ClientGroup) -> bool {
		self.occupants.contains(group)
	}

	/// Snapshot with `group` appended, or `None` if it does not fit.
	fn with_seated(&self, group: ClientGroup) -> Option<Self> {
		let free = self.free.checked_sub(group.size())?;
		let mut occupants = self.occupants.clone();
		occupants.push(group);
		let next = Self {
			table: self.table,
			occupants,
			free,
		};
		next.debug_check();
		Some(next)
	}

	/// Snapshot with the first occurrence of `group` removed, or `None` if absent.
	fn without(&self, group: &ClientGroup) -> Option<Self> {
		let pos = self.occupants.iter().position(|seated| seated == group)?;
		let mut occupants = self.occupants.clone();
		occupants.remove(pos);
		let next = Self {
			table: self.table,
			occupants,
			free: self.free + group.size(),
		};
		next.debug_check();
		Some(next)
	}

	fn occupied(&self) -> u8 {
		self.table.capacity() - self.free
	}

	fn debug_check(&self) {
		debug_assert_eq!(
			usize::from(self.free) + self.occupants.iter().map(|g| usize::from(g.size())).sum::<usize>(),
			usize::from(self.table.capacity()),
			"seat accounting broken for {}",
			self.table
		);
	}
}

/// Owned copy of one table's occupancy, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
	/// The physical table.
	pub table: Table,
	/// Groups seated at the table, in seating order.
	pub occupants: Vec<ClientGroup>,
	/// Seats not taken.
	pub free: u8,
}

impl SlotView {
	/// Returns true when free seats and occupant sizes add up to the table capacity.
	pub fn is_consistent(&self) -> bool {
		let taken: usize = self.occupants.iter().map(|g| usize::from(g.size())).sum();
		usize::from(self.free) + taken == usize::from(self.table.capacity())
	}
}

impl From<&SeatSlot> for SlotView {
	fn from(slot: &SeatSlot) -> Self {
		Self {
			table: slot.table,
			occupants: slot.occupants.to_vec(),
			free: slot.free,
		}
	}
}

/// A slot picked by a search, pinned to the snapshot the search saw.
#[derive(Debug)]
pub(crate) struct Candidate {
	index: usize,
	observed: Arc<SeatSlot>,
}

impl Candidate {
	pub(crate) fn table(&self) -> Table {
		self.observed.table
	}
}

/// Fixed set of independently swappable table slots.
pub struct SeatSlots {
	slots: Box<[ArcSwap<SeatSlot>]>,
}

impl SeatSlots {
	/// Creates one vacant slot per table, in the given order.
	pub fn new(tables: impl IntoIterator<Item = Table>) -> Self {
		Self {
			slots: tables
				.into_iter()
				.map(|table| ArcSwap::from_pointee(SeatSlot::vacant(table)))
				.collect(),
		}
	}

	/// Number of tables.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns true if the restaurant has no tables.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Tables in construction order.
	pub fn tables(&self) -> Vec<Table> {
		self.slots.iter().map(|cell| cell.load().table).collect()
	}

	/// Smallest entirely empty table that can take `group`.
	pub(crate) fn find_fully_free(&self, group: &ClientGroup) -> Option<Candidate> {
		self.best_fit(|slot| slot.is_fully_free() && slot.fits(group))
	}

	/// Smallest partially occupied table with enough free seats for `group`.
	pub(crate) fn find_partially_free(&self, group: &ClientGroup) -> Option<Candidate> {
		self.best_fit(|slot| !slot.occupants.is_empty() && slot.free > 0 && slot.fits(group))
	}

	fn best_fit(&self, admissible: impl Fn(&SeatSlot) -> bool) -> Option<Candidate> {
		self.slots
			.iter()
			.enumerate()
			.map(|(index, cell)| Candidate {
				index,
				observed: cell.load_full(),
			})
			.filter(|candidate| admissible(&candidate.observed))
			.min_by_key(|candidate| candidate.observed.table.capacity())
	}

	fn find_holding(&self, group: &ClientGroup) -> Option<Candidate> {
		self.slots.iter().enumerate().find_map(|(index, cell)| {
			let observed = cell.load_full();
			observed.holds(group).then_some(Candidate { index, observed })
		})
	}

	/// Publishes `next` iff the candidate's slot still holds the observed snapshot.
	fn publish(&self, candidate: &Candidate, next: SeatSlot) -> bool {
		let cell = &self.slots[candidate.index];
		let prev = cell.compare_and_swap(&candidate.observed, Arc::new(next));
		Arc::ptr_eq(&prev, &candidate.observed)
	}

	/// Seats `group` at the best fitting table, returning that table.
	///
	/// Fully free tables are preferred over partially occupied ones, and smaller tables over
	/// larger ones. Returns `None` once a fresh search finds no admissible table.
	pub fn try_seat(&self, group: &ClientGroup) -> Option<Table> {
		loop {
			let candidate = self
				.find_fully_free(group)
				.or_else(|| self.find_partially_free(group))?;
			let Some(next) = candidate.observed.with_seated(*group) else {
				continue;
			};
			if self.publish(&candidate, next) {
				tracing::trace!(
					size = group.size(),
					capacity = candidate.table().capacity(),
					slot = candidate.index,
					"seating.seat"
				);
				return Some(candidate.table());
			}
		}
	}

	/// Removes `group` from the table it occupies and returns its seats.
	///
	/// Fails with [`SeatingError::NotSeated`] if no table currently holds the group.
	pub fn release(&self, group: &ClientGroup) -> Result<Table, SeatingError> {
		loop {
			let Some(candidate) = self.find_holding(group) else {
				return Err(SeatingError::NotSeated { group: *group });
			};
			let Some(next) = candidate.observed.without(group) else {
				continue;
			};
			if self.publish(&candidate, next) {
				tracing::trace!(
					size = group.size(),
					capacity = candidate.table().capacity(),
					slot = candidate.index,
					"seating.release"
				);
				return Ok(candidate.table());
			}
		}
	}

	/// Maps every seated group to its table, reading each slot independently.
	///
	/// If equal groups are seated at two tables, the first table in slot order wins.
	pub fn snapshot_map(&self) -> FxHashMap<ClientGroup, Table> {
		let mut map = FxHashMap::default();
		for cell in self.slots.iter() {
			let slot = cell.load();
			for group in &slot.occupants {
				map.entry(*group).or_insert(slot.table);
			}
		}
		map
	}

	/// Table currently holding `group`, if any.
	pub fn lookup(&self, group: &ClientGroup) -> Option<Table> {
		self.snapshot_map().get(group).copied()
	}

	/// Total number of taken seats across all tables.
	pub fn occupied_seats(&self) -> usize {
		self.slots
			.iter()
			.map(|cell| usize::from(cell.load().occupied()))
			.sum()
	}

	/// Total number of seats across all tables.
	pub fn capacity(&self) -> usize {
		self.slots
			.iter()
			.map(|cell| usize::from(cell.load().table.capacity()))
			.sum()
	}

	/// Owned copies of every slot, in table order.
	pub fn views(&self) -> Vec<SlotView> {
		self.slots
			.iter()
			.map(|cell| SlotView::from(&**cell.load()))
			.collect()
	}
}

impl std::fmt::Debug for SeatSlots {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.views()).finish()
	}
}
