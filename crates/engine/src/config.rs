//! Engine configuration loaded from TOML.
//!
//! ```toml
//! tables = [2, 4, 4, 6]
//! wait = "yield"
//! ```

use std::path::Path;

use seatline_primitives::Table;
use seatline_worker::WaitPolicy;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Construction inputs for an engine. Fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
	/// Tables in slot order.
	pub tables: Vec<Table>,
	/// Dispatcher idle policy.
	#[serde(default)]
	pub wait: WaitPolicy,
}

impl EngineConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(src)?;
		if config.tables.is_empty() {
			return Err(ConfigError::NoTables);
		}
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let src = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&src)
	}
}
