//! Error types surfaced by engine operations and configuration loading.

use std::path::PathBuf;

use seatline_primitives::ClientGroup;
use thiserror::Error;

/// Caller-visible failures of engine operations.
///
/// CAS contention is retried internally and never appears here.
#[derive(Debug, Error)]
pub enum SeatingError {
	/// The group is not seated at any table (double leave, or leave without a seat).
	#[error("client group of {} is not seated at any table", .group.size())]
	NotSeated {
		/// The group the caller tried to release.
		group: ClientGroup,
	},

	/// The dispatcher thread could not be started.
	#[error("failed to spawn dispatcher thread: {0}")]
	DispatcherSpawn(#[source] std::io::Error),
}

/// Errors that can occur when loading an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an invalid field value.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The configuration lists no tables.
	#[error("configuration must list at least one table")]
	NoTables,
}
