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

//! Integration tests for the logging system
//!
//! The global subscriber can only be installed once per process, so the
//! whole lifecycle is checked in a single test.

mod common;

use crease_scoring::{MatchRules, logging::init_logging};

use common::{bowl, started_match};

#[test]
fn test_logging_initialization() {
	let root = tempfile::tempdir().unwrap();
	unsafe {
		std::env::set_var("LOG_DIR", root.path());
		std::env::set_var("LOG_TO_CONSOLE", "false");
	}

	init_logging("debug").unwrap();

	let log_dir = root.path().join("scoring");
	assert!(log_dir.is_dir(), "missing {}", log_dir.display());

	// Scoring a few balls must not trip over the installed subscriber
	let mut m = started_match(11, MatchRules::with_overs(1));
	bowl(&mut m, &[Some(1), Some(4), None]);
	m.undo_last_delivery().unwrap();
	m.shutdown();

	// A second subscriber is refused rather than replacing the first
	assert!(init_logging("info").is_err());
}
