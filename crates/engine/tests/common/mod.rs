#![allow(dead_code)]

use std::time::{Duration, Instant};

use seatline_engine::{ClientGroup, Table};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}

pub fn tables(capacities: &[u8]) -> Vec<Table> {
	capacities.iter().map(|&c| Table::new(c).unwrap()).collect()
}

pub fn table(capacity: u8) -> Table {
	Table::new(capacity).unwrap()
}

/// A group that arrived `age` ago, offset by `nth` nanoseconds to keep groups distinct.
pub fn aged(size: u8, age: Duration, nth: u32) -> ClientGroup {
	let at = Instant::now()
		.checked_sub(age)
		.expect("monotonic clock too close to its origin");
	ClientGroup::new(size, at + Duration::from_nanos(u64::from(nth))).unwrap()
}

pub fn eventually(what: &str, cond: impl Fn() -> bool) {
	let deadline = Instant::now() + Duration::from_secs(5);
	while !cond() {
		assert!(Instant::now() < deadline, "timed out waiting for {what}");
		std::thread::sleep(Duration::from_millis(1));
	}
}
