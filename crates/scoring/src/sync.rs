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

//! Remote sync of completed matches
//!
//! Fire-and-forget: the scorer never waits on the network. At most one
//! upload runs at a time; a trigger while one is in flight is dropped, and a
//! failed upload is retried on the next trigger.

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread::{self, JoinHandle},
	time::Duration,
};

use chrono::Utc;
use crease_sdk::{
	ClientError, SyncClient,
	types::{CompletedMatch, InningsSummary, PlayerPerformance, SyncAck},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{engine::MatchState, mom, stats::StatsAggregator, types::Phase};

/// Error types for remote sync
#[derive(Debug, Error)]
pub enum SyncError {
	/// Worth retrying later
	#[error("Transient sync failure: {0}")]
	Transient(String),
	#[error("Sync rejected: {0}")]
	Rejected(String),
	#[error("Sync client setup failed: {0}")]
	Setup(String),
}

impl From<ClientError> for SyncError {
	fn from(err: ClientError) -> Self {
		if err.is_transient() {
			SyncError::Transient(err.to_string())
		} else {
			SyncError::Rejected(err.to_string())
		}
	}
}

/// Remote Sync Client trait - uploads a finished match
///
/// Uploads must be idempotent upserts keyed by match id (and player id for
/// the performance rows), since the coordinator may send the same record
/// more than once.
pub trait RemoteSyncClient: Send + Sync {
	fn upsert_completed_match(&self, record: &CompletedMatch) -> Result<SyncAck, SyncError>;
}

/// HTTP implementation on top of the SDK's blocking client
pub struct HttpSyncClient {
	client: SyncClient,
}

impl HttpSyncClient {
	pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SyncError> {
		let client =
			SyncClient::new(endpoint, timeout).map_err(|e| SyncError::Setup(e.to_string()))?;
		Ok(Self { client })
	}
}

impl RemoteSyncClient for HttpSyncClient {
	fn upsert_completed_match(&self, record: &CompletedMatch) -> Result<SyncAck, SyncError> {
		Ok(self.client.upsert_match(record)?)
	}
}

/// What a trigger did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
	Started,
	AlreadyInFlight,
	AlreadySynced,
	/// Worker could not be spawned; the next trigger tries again
	Deferred,
}

/// Single-flight background uploader for one match
pub struct SyncCoordinator {
	client: Arc<dyn RemoteSyncClient>,
	in_flight: Arc<AtomicBool>,
	synced: Arc<AtomicBool>,
	worker: Option<JoinHandle<()>>,
}

impl SyncCoordinator {
	pub fn new(client: Arc<dyn RemoteSyncClient>) -> Self {
		Self {
			client,
			in_flight: Arc::new(AtomicBool::new(false)),
			synced: Arc::new(AtomicBool::new(false)),
			worker: None,
		}
	}

	/// Record an upload that happened before this coordinator existed
	pub fn mark_synced(&self) {
		self.synced.store(true, Ordering::Release);
	}

	pub fn is_synced(&self) -> bool {
		self.synced.load(Ordering::Acquire)
	}

	pub fn is_in_flight(&self) -> bool {
		self.in_flight.load(Ordering::Acquire)
	}

	/// Start an upload unless one is running or the match is already synced
	pub fn trigger(&mut self, record: CompletedMatch) -> SyncTrigger {
		if self.is_synced() {
			return SyncTrigger::AlreadySynced;
		}

		if self
			.in_flight
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			return SyncTrigger::AlreadyInFlight;
		}

		// Previous worker has cleared the flag and is about to exit
		if let Some(previous) = self.worker.take()
			&& previous.join().is_err()
		{
			error!(target: "sync", "Sync worker panicked");
		}

		let client = self.client.clone();
		let in_flight = self.in_flight.clone();
		let synced = self.synced.clone();
		let match_id = record.match_id;

		let spawned = thread::Builder::new()
			.name("match-sync".to_string())
			.spawn(move || {
				match client.upsert_completed_match(&record) {
					Ok(ack) => {
						synced.store(true, Ordering::Release);
						info!(
							target: "sync",
							%match_id,
							rows_upserted = ack.rows_upserted,
							"Completed match synced"
						);
					}
					Err(SyncError::Transient(reason)) => {
						warn!(
							target: "sync",
							%match_id,
							%reason,
							"Sync failed, will retry on next trigger"
						);
					}
					Err(e) => {
						error!(target: "sync", %match_id, error = %e, "Sync failed");
					}
				}
				in_flight.store(false, Ordering::Release);
			});

		match spawned {
			Ok(handle) => {
				self.worker = Some(handle);
				SyncTrigger::Started
			}
			Err(e) => {
				self.in_flight.store(false, Ordering::Release);
				error!(target: "sync", %match_id, error = %e, "Failed to spawn sync worker");
				SyncTrigger::Deferred
			}
		}
	}

	/// Block until the running upload, if any, has finished
	pub fn wait_idle(&mut self) {
		if let Some(handle) = self.worker.take()
			&& handle.join().is_err()
		{
			self.in_flight.store(false, Ordering::Release);
			error!(target: "sync", "Sync worker panicked");
		}
	}
}

impl Drop for SyncCoordinator {
	fn drop(&mut self) {
		self.wait_idle();
	}
}

/// Record pushed to the remote archive, `None` until the match is completed
pub fn build_completed_match(
	state: &MatchState,
	stats: &StatsAggregator,
) -> Option<CompletedMatch> {
	if state.phase != Phase::Completed {
		return None;
	}
	let result = state.result.as_ref()?;

	let innings = state
		.innings
		.iter()
		.filter(|i| i.started)
		.map(|i| InningsSummary {
			team_id: state.teams[i.batting_team].id.clone(),
			runs: i.runs,
			wickets: i.wickets,
			overs: i.overs(),
		})
		.collect();

	let performances = mom::rank(state, stats)
		.entries
		.into_iter()
		.map(|entry| {
			let figures = stats.of(&entry.player_id);
			PlayerPerformance {
				match_id: state.match_id,
				player_id: entry.player_id,
				team_id: entry.team_id,
				runs: figures.batting.runs,
				balls_faced: figures.batting.balls_faced,
				fours: figures.batting.fours,
				sixes: figures.batting.sixes,
				runs_conceded: figures.bowling.runs_conceded,
				balls_bowled: figures.bowling.balls_bowled,
				wickets: figures.bowling.wickets,
				maidens: figures.bowling.maidens,
				mom_score: entry.score,
			}
		})
		.collect();

	Some(CompletedMatch {
		match_id: state.match_id,
		completed_at: Utc::now(),
		overs_limit: state.total_overs_limit,
		innings,
		winner_team_id: result.winner_index().map(|i| state.teams[i].id.clone()),
		result: result.summary(state.team_names()),
		man_of_the_match: state.man_of_the_match.as_ref().map(|m| m.player_id.clone()),
		performances,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{
		Mutex,
		atomic::AtomicUsize,
		mpsc::{self, Receiver},
	};
	use uuid::Uuid;

	/// Fails the first `failures` calls, optionally blocking each call on a gate
	struct MockClient {
		calls: AtomicUsize,
		failures: usize,
		gate: Option<Mutex<Receiver<()>>>,
	}

	impl MockClient {
		fn new(failures: usize) -> Self {
			Self {
				calls: AtomicUsize::new(0),
				failures,
				gate: None,
			}
		}
	}

	impl RemoteSyncClient for MockClient {
		fn upsert_completed_match(&self, record: &CompletedMatch) -> Result<SyncAck, SyncError> {
			if let Some(gate) = &self.gate {
				gate.lock().unwrap().recv().unwrap();
			}
			let call = self.calls.fetch_add(1, Ordering::SeqCst);
			if call < self.failures {
				return Err(SyncError::Transient("connection reset".to_string()));
			}
			Ok(SyncAck {
				match_id: record.match_id,
				rows_upserted: record.performances.len() as u32,
			})
		}
	}

	fn record() -> CompletedMatch {
		CompletedMatch {
			match_id: Uuid::new_v4(),
			completed_at: Utc::now(),
			overs_limit: 5,
			innings: Vec::new(),
			winner_team_id: None,
			result: "Match tied".to_string(),
			man_of_the_match: None,
			performances: Vec::new(),
		}
	}

	#[test]
	fn test_failed_sync_retried_on_next_trigger() {
		let client = Arc::new(MockClient::new(1));
		let mut coordinator = SyncCoordinator::new(client.clone());
		let record = record();

		assert_eq!(coordinator.trigger(record.clone()), SyncTrigger::Started);
		coordinator.wait_idle();
		assert!(!coordinator.is_synced());

		assert_eq!(coordinator.trigger(record.clone()), SyncTrigger::Started);
		coordinator.wait_idle();
		assert!(coordinator.is_synced());

		assert_eq!(coordinator.trigger(record), SyncTrigger::AlreadySynced);
		assert_eq!(client.calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn test_single_flight() {
		let (release, gate) = mpsc::channel();
		let client = Arc::new(MockClient {
			gate: Some(Mutex::new(gate)),
			..MockClient::new(0)
		});
		let mut coordinator = SyncCoordinator::new(client.clone());
		let record = record();

		assert_eq!(coordinator.trigger(record.clone()), SyncTrigger::Started);
		assert!(coordinator.is_in_flight());
		assert_eq!(coordinator.trigger(record), SyncTrigger::AlreadyInFlight);

		release.send(()).unwrap();
		coordinator.wait_idle();

		assert!(coordinator.is_synced());
		assert!(!coordinator.is_in_flight());
		assert_eq!(client.calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn test_client_error_classification() {
		assert!(matches!(
			SyncError::from(ClientError::Network("timeout".to_string())),
			SyncError::Transient(_)
		));
		assert!(matches!(
			SyncError::from(ClientError::Server("503 Service Unavailable: busy".to_string())),
			SyncError::Transient(_)
		));
		assert!(matches!(
			SyncError::from(ClientError::Server("400 Bad Request: bad".to_string())),
			SyncError::Rejected(_)
		));
	}
}
