// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::types::MatchRules;

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Log level used when `verbose_logging` is set and RUST_LOG is not
pub const VERBOSE_LOG_LEVEL: &str = "debug";
/// Component name used for the log directory and file prefix
pub const LOG_COMPONENT_NAME: &str = "scoring";
/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

/// Environment variable prefix, e.g. `CREASE_OVERS_LIMIT=10`
pub const ENV_PREFIX: &str = "CREASE";

/// Default remote sync request timeout (ms)
pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 10_000;

/// Scoring engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
	/// Overs per innings
	pub overs_limit: u32,
	pub wide_penalty: u32,
	pub no_ball_penalty: u32,
	pub last_man_standing: bool,
	pub max_overs_per_bowler: Option<u32>,
	/// Directory of the JSON match store, no persistence when unset
	pub store_path: Option<PathBuf>,
	/// Base URL of the remote match archive, no sync when unset
	pub sync_endpoint: Option<String>,
	pub sync_timeout_ms: u64,
	/// Log every delivery
	pub verbose_logging: bool,
}

impl Default for ScoringConfig {
	fn default() -> Self {
		let rules = MatchRules::default();
		Self {
			overs_limit: rules.overs_limit,
			wide_penalty: rules.wide_penalty,
			no_ball_penalty: rules.no_ball_penalty,
			last_man_standing: rules.last_man_standing,
			max_overs_per_bowler: rules.max_overs_per_bowler,
			store_path: None,
			sync_endpoint: None,
			sync_timeout_ms: DEFAULT_SYNC_TIMEOUT_MS,
			verbose_logging: false,
		}
	}
}

impl ScoringConfig {
	fn environment() -> config::Environment {
		config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
	}

	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(Self::environment())
			.build()?;

		cfg.try_deserialize()
	}

	/// Load configuration from file, overridden by environment variables
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(Self::environment())
			.build()?;

		cfg.try_deserialize()
	}

	/// Playing conditions for a new match
	pub fn rules(&self) -> MatchRules {
		MatchRules {
			overs_limit: self.overs_limit,
			wide_penalty: self.wide_penalty,
			no_ball_penalty: self.no_ball_penalty,
			last_man_standing: self.last_man_standing,
			max_overs_per_bowler: self.max_overs_per_bowler,
		}
	}

	pub fn sync_timeout(&self) -> Duration {
		Duration::from_millis(self.sync_timeout_ms)
	}

	pub fn log_level(&self) -> &'static str {
		if self.verbose_logging {
			VERBOSE_LOG_LEVEL
		} else {
			DEFAULT_LOG_LEVEL
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_match_rules() {
		let config = ScoringConfig::default();
		assert_eq!(config.rules(), MatchRules::default());
		assert_eq!(config.sync_timeout(), Duration::from_secs(10));
		assert_eq!(config.log_level(), "info");
	}

	#[test]
	fn test_from_file_fills_missing_fields() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("scoring.toml");
		std::fs::write(
			&path,
			concat!(
				"overs_limit = 5\n",
				"last_man_standing = false\n",
				"max_overs_per_bowler = 2\n",
				"sync_endpoint = \"http://archive.local\"\n",
			),
		)
		.unwrap();

		let config = ScoringConfig::from_file(path.to_str().unwrap()).unwrap();
		assert_eq!(config.overs_limit, 5);
		assert!(!config.last_man_standing);
		assert_eq!(config.max_overs_per_bowler, Some(2));
		assert_eq!(config.sync_endpoint.as_deref(), Some("http://archive.local"));
		assert_eq!(config.wide_penalty, 1);
		assert_eq!(config.sync_timeout_ms, DEFAULT_SYNC_TIMEOUT_MS);
		assert!(config.store_path.is_none());
	}
}
