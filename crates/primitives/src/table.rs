use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Seat counts a physical table may have.
pub const TABLE_CAPACITIES: RangeInclusive<u8> = 2..=6;

/// A physical table with a fixed number of seats.
///
/// The capacity is validated on construction and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Table {
	capacity: u8,
}

impl Table {
	/// Creates a table, rejecting capacities outside [`TABLE_CAPACITIES`].
	pub fn new(capacity: u8) -> Result<Self, DomainError> {
		if TABLE_CAPACITIES.contains(&capacity) {
			Ok(Self { capacity })
		} else {
			Err(DomainError::InvalidCapacity(capacity))
		}
	}

	/// Returns the number of seats at this table.
	#[inline]
	pub const fn capacity(self) -> u8 {
		self.capacity
	}
}

impl TryFrom<u8> for Table {
	type Error = DomainError;

	fn try_from(capacity: u8) -> Result<Self, Self::Error> {
		Self::new(capacity)
	}
}

impl From<Table> for u8 {
	fn from(table: Table) -> Self {
		table.capacity
	}
}

impl fmt::Display for Table {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "table({})", self.capacity)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(2)]
	#[case(3)]
	#[case(4)]
	#[case(5)]
	#[case(6)]
	fn accepts_allowed_capacities(#[case] capacity: u8) {
		assert_eq!(Table::new(capacity).map(Table::capacity), Ok(capacity));
	}

	#[rstest]
	#[case(0)]
	#[case(1)]
	#[case(7)]
	#[case(u8::MAX)]
	fn rejects_disallowed_capacities(#[case] capacity: u8) {
		assert_eq!(Table::new(capacity), Err(DomainError::InvalidCapacity(capacity)));
	}

	#[test]
	fn deserialize_goes_through_validation() {
		#[derive(Debug, Deserialize)]
		struct Layout {
			tables: Vec<Table>,
		}

		let layout: Layout = toml::from_str("tables = [2, 6]").unwrap();
		assert_eq!(layout.tables, vec![Table::new(2).unwrap(), Table::new(6).unwrap()]);

		let err = toml::from_str::<Layout>("tables = [2, 9]").unwrap_err();
		assert!(err.to_string().contains("invalid table capacity 9"), "got: {err}");
	}
}
