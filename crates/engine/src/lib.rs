//! Lock-free seat assignment for a restaurant with a fixed set of tables.
//!
//! # Purpose
//!
//! Let many threads record arrivals, departures, and queue abandonment concurrently while one
//! background dispatcher keeps matching waiting groups to freed seats, without locks, without
//! lost updates, and without overbooking a table.
//!
//! # Mental model
//!
//! * [`SeatSlots`] holds one immutable snapshot per table behind an atomic cell. Writers
//!   re-derive a replacement from the latest snapshot and publish it with CAS.
//! * [`WaitingQueue`] keeps unseated groups in arrival order and hands them to the dispatcher
//!   one claim at a time.
//! * The dispatcher starts on the first arrival and drains the queue into free seats, calling
//!   the configured [`WaitStrategy`](seatline_worker::WaitStrategy) when idle.
//! * [`LockFreeEngine`] composes the three behind the [`SeatingBackend`] trait.
//!
//! # Invariants
//!
//! * Seat accounting: `free + sum(occupant sizes) == capacity` for every published slot.
//!   - Enforced in: `SeatSlot::with_seated`, `SeatSlot::without`.
//!   - Tested by: `invariants::capacity_holds_under_contention`.
//! * No double seating: a group is committed to at most one slot.
//!   - Enforced in: the queue claim protocol and [`SeatSlots::try_seat`]. A group abandoned
//!     mid-claim has any seat the dispatcher just gave it released again.
//!   - Tested by: `invariants::no_group_is_lost_or_duplicated`.
//! * Fairness: a newcomer never skips a waiting group of equal or smaller size.
//!   - Enforced in: [`LockFreeEngine`]'s `on_arrive` and the dispatcher's drain pass.
//!   - Tested by: `equal_sized_newcomer_queues_behind_waiting_group` (tests/scenario.rs).
//! * Exactly one dispatcher per engine.
//!   - Enforced in: `Dispatcher::ensure_started` (atomic swap).
//!   - Tested by: `invariants::dispatcher_starts_once`.
//!
//! # Concurrency
//!
//! * Reads (`lookup`, counts) are wait-free loads of per-slot snapshots. They are consistent
//!   per table, not across tables.
//! * Writes are lock-free CAS retry loops. Retries are unbounded and invisible to callers.

mod backend;
mod config;
mod dispatch;
mod engine;
mod error;
mod queue;
mod slots;

pub use backend::{Admission, SeatingBackend};
pub use config::EngineConfig;
pub use dispatch::{DISPATCH_THREAD_NAME, DispatcherState};
pub use engine::LockFreeEngine;
pub use error::{ConfigError, SeatingError};
pub use queue::WaitingQueue;
pub use seatline_primitives::{ClientGroup, DomainError, Table};
pub use seatline_worker::{WaitPolicy, WaitStrategy};
pub use slots::{SeatSlots, SlotView};

#[cfg(test)]
mod invariants;

#[cfg(test)]
pub(crate) mod test_fixtures;
