use thiserror::Error;

use crate::{GROUP_SIZES, TABLE_CAPACITIES};

/// Rejection raised when a domain value is built from an out-of-range number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
	/// Table capacity outside [`TABLE_CAPACITIES`].
	#[error("invalid table capacity {0} (expected {min}..={max})", min = TABLE_CAPACITIES.start(), max = TABLE_CAPACITIES.end())]
	InvalidCapacity(u8),

	/// Client group size outside [`GROUP_SIZES`].
	#[error("invalid client group size {0} (expected {min}..={max})", min = GROUP_SIZES.start(), max = GROUP_SIZES.end())]
	InvalidGroupSize(u8),
}
