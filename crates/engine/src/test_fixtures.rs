use std::time::{Duration, Instant};

use seatline_primitives::{ClientGroup, Table};

pub(crate) fn tables(capacities: &[u8]) -> Vec<Table> {
	capacities.iter().map(|&c| Table::new(c).unwrap()).collect()
}

/// Groups with the given sizes and strictly increasing arrival instants.
pub(crate) fn distinct_groups<const N: usize>(sizes: [u8; N]) -> [ClientGroup; N] {
	let base = Instant::now();
	let mut n = 0u64;
	sizes.map(|size| {
		n += 1;
		ClientGroup::new(size, base + Duration::from_nanos(n)).unwrap()
	})
}

/// A group that arrived `age` ago.
pub(crate) fn aged(size: u8, age: Duration) -> ClientGroup {
	let at = Instant::now().checked_sub(age).expect("monotonic clock too close to its origin");
	ClientGroup::new(size, at).unwrap()
}
