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
	fs, io,
	path::{Path, PathBuf},
};

use tracing::debug;
use uuid::Uuid;

use super::{MatchStore, PersistedMatch, StoreError};

const EXTENSION: &str = "json";

/// One JSON document per match under a directory
///
/// Documents are written to a temporary file and renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileMatchStore {
	dir: PathBuf,
}

impl FileMatchStore {
	/// Open a store rooted at `dir`, creating the directory if needed
	pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let dir = dir.into();
		fs::create_dir_all(&dir)?;
		Ok(Self { dir })
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	fn path_for(&self, match_id: Uuid) -> PathBuf {
		self.dir.join(format!("{}.{}", match_id, EXTENSION))
	}
}

impl MatchStore for FileMatchStore {
	fn save(&mut self, record: &PersistedMatch) -> Result<(), StoreError> {
		let path = self.path_for(record.match_id());
		let tmp = path.with_extension("json.tmp");

		let data = serde_json::to_vec_pretty(record)?;
		fs::write(&tmp, &data)?;
		fs::rename(&tmp, &path)?;

		debug!(
			target: "store",
			match_id = %record.match_id(),
			size_bytes = data.len(),
			deliveries = record.state.ball_log.len(),
			"Match saved"
		);
		Ok(())
	}

	fn load(&self, match_id: Uuid) -> Result<PersistedMatch, StoreError> {
		let data = match fs::read(self.path_for(match_id)) {
			Ok(data) => data,
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				return Err(StoreError::NotFound(match_id));
			}
			Err(e) => return Err(e.into()),
		};
		Ok(serde_json::from_slice(&data)?)
	}

	fn list(&self) -> Result<Vec<Uuid>, StoreError> {
		let mut ids = Vec::new();
		for entry in fs::read_dir(&self.dir)? {
			let path = entry?.path();
			if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
				continue;
			}
			if let Some(id) = path
				.file_stem()
				.and_then(|s| s.to_str())
				.and_then(|s| Uuid::parse_str(s).ok())
			{
				ids.push(id);
			}
		}
		ids.sort();
		Ok(ids)
	}
}
