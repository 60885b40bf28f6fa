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

use std::{
	collections::HashMap,
	sync::{Arc, Mutex, PoisonError},
};

use uuid::Uuid;

use super::{MatchStore, PersistedMatch, StoreError};

/// In-memory match store
///
/// Clones share the same records, so a test can keep a handle while the
/// orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryMatchStore {
	records: Arc<Mutex<HashMap<Uuid, PersistedMatch>>>,
	saves: Arc<Mutex<u64>>,
}

impl MemoryMatchStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of successful saves so far
	pub fn save_count(&self) -> u64 {
		*self.saves.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl MatchStore for MemoryMatchStore {
	fn save(&mut self, record: &PersistedMatch) -> Result<(), StoreError> {
		let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
		records.insert(record.match_id(), record.clone());
		*self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
		Ok(())
	}

	fn load(&self, match_id: Uuid) -> Result<PersistedMatch, StoreError> {
		let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
		records
			.get(&match_id)
			.cloned()
			.ok_or(StoreError::NotFound(match_id))
	}

	fn list(&self) -> Result<Vec<Uuid>, StoreError> {
		let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
		let mut ids: Vec<Uuid> = records.keys().copied().collect();
		ids.sort();
		Ok(ids)
	}
}
