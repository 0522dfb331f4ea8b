use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use crate::DomainError;

/// Party sizes a client group may have.
pub const GROUP_SIZES: RangeInclusive<u8> = 1..=6;

/// A party of clients arriving together.
///
/// Identity is by value: two groups with the same size and arrival instant are
/// indistinguishable to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientGroup {
	size: u8,
	arrived_at: Instant,
}

impl ClientGroup {
	/// Creates a group that arrived at `arrived_at`.
	pub fn new(size: u8, arrived_at: Instant) -> Result<Self, DomainError> {
		if GROUP_SIZES.contains(&size) {
			Ok(Self { size, arrived_at })
		} else {
			Err(DomainError::InvalidGroupSize(size))
		}
	}

	/// Creates a group stamped with the current instant.
	pub fn arriving_now(size: u8) -> Result<Self, DomainError> {
		Self::new(size, Instant::now())
	}

	/// Number of people in the group.
	#[inline]
	pub const fn size(&self) -> u8 {
		self.size
	}

	/// Instant the group arrived at the restaurant.
	#[inline]
	pub const fn arrived_at(&self) -> Instant {
		self.arrived_at
	}

	/// Time spent waiting as of `now`; zero if `now` precedes arrival.
	pub fn waited(&self, now: Instant) -> Duration {
		now.saturating_duration_since(self.arrived_at)
	}

	/// Returns true when the group has waited strictly longer than `limit` as of `now`.
	pub fn waited_longer_than(&self, limit: Duration, now: Instant) -> bool {
		self.waited(now) > limit
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(0)]
	#[case(7)]
	#[case(200)]
	fn rejects_disallowed_sizes(#[case] size: u8) {
		assert_eq!(
			ClientGroup::arriving_now(size),
			Err(DomainError::InvalidGroupSize(size))
		);
	}

	#[test]
	fn equality_is_by_size_and_arrival() {
		let at = Instant::now();
		let a = ClientGroup::new(3, at).unwrap();
		assert_eq!(a, ClientGroup::new(3, at).unwrap());
		assert_ne!(a, ClientGroup::new(4, at).unwrap());
		assert_ne!(a, ClientGroup::new(3, at + Duration::from_nanos(1)).unwrap());
	}

	#[test]
	fn wait_limit_is_strict() {
		let at = Instant::now();
		let group = ClientGroup::new(2, at).unwrap();
		let now = at + Duration::from_secs(5);
		assert!(!group.waited_longer_than(Duration::from_secs(5), now));
		assert!(group.waited_longer_than(Duration::from_secs(4), now));
	}

	#[test]
	fn wait_saturates_before_arrival() {
		let at = Instant::now() + Duration::from_secs(60);
		let group = ClientGroup::new(1, at).unwrap();
		assert_eq!(group.waited(Instant::now()), Duration::ZERO);
	}

	proptest! {
		#[test]
		fn construction_matches_allowed_set(size in any::<u8>()) {
			let built = ClientGroup::arriving_now(size);
			prop_assert_eq!(built.is_ok(), GROUP_SIZES.contains(&size));
		}
	}
}
