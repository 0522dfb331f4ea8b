//! Invariant proofs run against the engine under real thread contention.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::time::{Duration, Instant};

use seatline_primitives::ClientGroup;
use seatline_worker::WaitPolicy;

use crate::test_fixtures::tables;
use crate::{Admission, LockFreeEngine, SeatingBackend, SlotView};

const WORKERS: u64 = 8;
const ROUNDS: u64 = 200;

fn unique_group(base: Instant, worker: u64, round: u64) -> ClientGroup {
	let size = ((worker * 7 + round * 3) % 6 + 1) as u8;
	ClientGroup::new(size, base + Duration::from_nanos(worker * 10_000 + round)).unwrap()
}

/// Polls `cond` until it holds, failing after a generous deadline.
fn settles(what: &str, cond: impl Fn() -> bool) {
	let deadline = Instant::now() + Duration::from_secs(5);
	while !cond() {
		assert!(Instant::now() < deadline, "never settled: {what}");
		std::thread::yield_now();
	}
}

/// Drives one group through the engine until it has left, one way or the other.
///
/// Returns true if the group was ever seated.
fn cycle(engine: &LockFreeEngine, group: ClientGroup) -> bool {
	match engine.on_arrive(group).unwrap() {
		Admission::Seated(table) => {
			assert_eq!(engine.lookup(&group), Some(table));
			engine.on_leave(&group).unwrap();
			true
		}
		Admission::Queued => {
			if engine.abandon_queue(&group) {
				// A dispatcher that seated the group mid-claim gives the seats back.
				settles("abandoned group unseated", || engine.lookup(&group).is_none());
				false
			} else {
				// The dispatcher won: the group must already be committed to a table.
				let table = engine.lookup(&group).expect("group neither queued nor seated");
				assert_eq!(engine.on_leave(&group).unwrap(), table);
				true
			}
		}
	}
}

fn assert_no_duplicates(views: &[SlotView]) {
	let mut seen = HashSet::new();
	for view in views {
		assert!(view.is_consistent(), "torn slot: {view:?}");
		for group in &view.occupants {
			assert!(seen.insert(*group), "group seated twice: {group:?}");
		}
	}
}

/// Invariant: every published slot keeps its seat accounting while writers race.
#[test]
fn capacity_holds_under_contention() {
	let engine = LockFreeEngine::new(tables(&[2, 3, 4, 5, 6]), WaitPolicy::Yield);
	let base = Instant::now();
	let done = AtomicBool::new(false);

	std::thread::scope(|s| {
		let checker = s.spawn(|| {
			let mut samples = 0usize;
			loop {
				assert_no_duplicates(&engine.slot_views());
				samples += 1;
				if done.load(Ordering::Acquire) {
					break samples;
				}
			}
		});

		let workers: Vec<_> = (0..WORKERS)
			.map(|worker| {
				let engine = &engine;
				s.spawn(move || {
					for round in 0..ROUNDS {
						cycle(engine, unique_group(base, worker, round));
					}
				})
			})
			.collect();
		for worker in workers {
			worker.join().unwrap();
		}
		done.store(true, Ordering::Release);
		assert!(checker.join().unwrap() > 0);
	});

	settles("all seats free", || engine.seated_count() == 0);
	assert_eq!(engine.queue_count(), 0);
}

/// Invariant: every arrival ends up seated or abandoned, never both and never neither.
#[test]
fn no_group_is_lost_or_duplicated() {
	let engine = LockFreeEngine::new(tables(&[2, 4]), WaitPolicy::Spin);
	let base = Instant::now();

	let seated: u64 = std::thread::scope(|s| {
		let workers: Vec<_> = (0..WORKERS)
			.map(|worker| {
				let engine = &engine;
				s.spawn(move || {
					(0..ROUNDS)
						.filter(|&round| cycle(engine, unique_group(base, worker, round)))
						.count() as u64
				})
			})
			.collect();
		workers.into_iter().map(|w| w.join().unwrap()).sum()
	});

	assert!(seated > 0, "no group was ever seated");
	assert_eq!(engine.queued_groups(), Vec::<ClientGroup>::new());
	settles("all seats free", || engine.seated_count() == 0);
	assert_no_duplicates(&engine.slot_views());
}

/// Invariant: racing first arrivals start exactly one dispatcher.
#[test]
fn dispatcher_starts_once() {
	let dispatchers = Arc::new(Mutex::new(HashSet::new()));
	let engine = LockFreeEngine::new(tables(&[2]), {
		let dispatchers = Arc::clone(&dispatchers);
		move || {
			if let Ok(mut ids) = dispatchers.lock() {
				ids.insert(std::thread::current().id());
			}
			std::thread::yield_now();
		}
	});
	let base = Instant::now();
	let barrier = Barrier::new(16);

	std::thread::scope(|s| {
		for worker in 0..16u64 {
			let (engine, barrier) = (&engine, &barrier);
			s.spawn(move || {
				barrier.wait();
				engine.on_arrive(unique_group(base, worker, 0)).unwrap();
			});
		}
	});

	let deadline = Instant::now() + Duration::from_secs(5);
	while dispatchers.lock().unwrap().is_empty() {
		assert!(Instant::now() < deadline, "dispatcher never idled");
		std::thread::sleep(Duration::from_millis(1));
	}
	std::thread::sleep(Duration::from_millis(50));
	assert_eq!(dispatchers.lock().unwrap().len(), 1);
}
