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

mod file;
mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{engine::MatchState, stats::StatsAggregator};
pub use file::FileMatchStore;
pub use memory::MemoryMatchStore;

/// Error types for match store operations
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
	#[error("No stored match with id {0}")]
	NotFound(Uuid),
}

/// Everything needed to resume a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedMatch {
	pub saved_at: DateTime<Utc>,
	pub state: MatchState,
	pub stats: StatsAggregator,
	/// Completed match has been accepted by the remote archive
	#[serde(default)]
	pub synced: bool,
}

impl PersistedMatch {
	pub fn new(state: &MatchState, stats: &StatsAggregator) -> Self {
		Self {
			saved_at: Utc::now(),
			state: state.clone(),
			stats: stats.clone(),
			synced: false,
		}
	}

	pub fn with_synced(mut self, synced: bool) -> Self {
		self.synced = synced;
		self
	}

	pub fn match_id(&self) -> Uuid {
		self.state.match_id
	}
}

/// Match Store trait - persistence sink for live matches
///
/// The orchestrator saves the complete match after every successful
/// command. Each save replaces the previous record of the same match, so
/// the store only ever holds the latest state, ball log and undo snapshots
/// included.
///
/// Implementations:
/// - In-memory (testing, scratch matches)
/// - Local filesystem (one JSON document per match)
pub trait MatchStore: Send {
	/// Save or replace the record of a match
	fn save(&mut self, record: &PersistedMatch) -> Result<(), StoreError>;

	/// Load the latest record of a match
	fn load(&self, match_id: Uuid) -> Result<PersistedMatch, StoreError>;

	/// Ids of all stored matches
	fn list(&self) -> Result<Vec<Uuid>, StoreError>;
}
