//! Core value types for seat assignment: tables, client groups, and their validation errors.

/// Client group identity and arrival bookkeeping.
pub mod group;
/// Validation errors for domain values.
pub mod error;
/// Physical table definitions.
pub mod table;

pub use error::DomainError;
pub use group::{ClientGroup, GROUP_SIZES};
pub use table::{TABLE_CAPACITIES, Table};
