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

use std::{collections::HashSet, sync::Arc};

use crease_sdk::types::{Delivery, DismissalType, ExtraType, Team};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
	engine::{self, MatchState},
	lifecycle::{self, InningsStart},
	mom::{self, MomAward, MomRanking},
	rotation, scorecard,
	scorecard::Scorecard,
	stats::StatsAggregator,
	store::{MatchStore, PersistedMatch, StoreError},
	sync::{self, RemoteSyncClient, SyncCoordinator, SyncTrigger},
	types::{DeliveryOutcome, DeliveryRecord, MatchRules, Phase, ScoringError, ValidationError},
	undo,
};

/// Teams and playing conditions agreed at the toss
#[derive(Debug, Clone)]
pub struct MatchSetup {
	pub match_id: Uuid,
	pub teams: [Team; 2],
	pub rules: MatchRules,
}

impl MatchSetup {
	pub fn new(teams: [Team; 2], rules: MatchRules) -> Self {
		Self {
			match_id: Uuid::new_v4(),
			teams,
			rules,
		}
	}

	fn validate(&self) -> Result<(), ValidationError> {
		let invalid = |msg: String| Err(ValidationError::InvalidSetup(msg));

		if self.teams[0].id == self.teams[1].id {
			return invalid(format!("both teams have id {}", self.teams[0].id));
		}
		if self.rules.overs_limit == 0 {
			return invalid("overs limit must be at least one".to_string());
		}

		let mut seen = HashSet::new();
		for team in &self.teams {
			if team.size() < 2 {
				return invalid(format!("team {} needs at least two players", team.id));
			}
			for player in &team.players {
				if !seen.insert(player.id.as_str()) {
					return invalid(format!("player {} appears more than once", player.id));
				}
			}
		}
		Ok(())
	}
}

/// Command façade over one match
///
/// Owns the match state and the statistics dictionary. Every successful
/// mutating command is followed by a save to the attached store, and once
/// the match is completed, by a remote sync trigger.
pub struct MatchOrchestrator {
	state: MatchState,
	stats: StatsAggregator,
	store: Option<Box<dyn MatchStore>>,
	sync: Option<SyncCoordinator>,
	/// Synced flag held by the store
	synced_on_record: bool,
}

impl MatchOrchestrator {
	pub fn new(setup: MatchSetup) -> Result<Self, ScoringError> {
		setup.validate()?;
		info!(
			target: "engine",
			match_id = %setup.match_id,
			home = %setup.teams[0].id,
			away = %setup.teams[1].id,
			overs = setup.rules.overs_limit,
			"Match created"
		);
		Ok(Self {
			state: MatchState::new(setup.match_id, setup.teams, setup.rules),
			stats: StatsAggregator::new(),
			store: None,
			sync: None,
			synced_on_record: false,
		})
	}

	/// Pick up a stored match where it was left
	pub fn resume(store: Box<dyn MatchStore>, match_id: Uuid) -> Result<Self, StoreError> {
		let record = store.load(match_id)?;
		info!(
			target: "store",
			%match_id,
			phase = %record.state.phase,
			deliveries = record.state.ball_log.len(),
			saved_at = %record.saved_at,
			synced = record.synced,
			"Match resumed"
		);
		Ok(Self {
			state: record.state,
			stats: record.stats,
			store: Some(store),
			sync: None,
			synced_on_record: record.synced,
		})
	}

	pub fn with_store(mut self, store: Box<dyn MatchStore>) -> Self {
		self.store = Some(store);
		self
	}

	/// Attach the remote archive
	///
	/// A completed match that has not been synced yet is pushed straight
	/// away, which covers uploads that failed before a resume.
	pub fn with_sync(mut self, client: Arc<dyn RemoteSyncClient>) -> Self {
		let coordinator = SyncCoordinator::new(client);
		if self.synced_on_record {
			coordinator.mark_synced();
		}
		self.sync = Some(coordinator);

		if self.state.phase == Phase::Completed
			&& let Some(trigger) = self.retry_sync()
		{
			info!(
				target: "sync",
				match_id = %self.state.match_id,
				?trigger,
				"Sync attached to completed match"
			);
		}
		self
	}

	pub fn match_id(&self) -> Uuid {
		self.state.match_id
	}

	pub fn start_innings(&mut self, start: &InningsStart) -> Result<(), ScoringError> {
		lifecycle::start_innings(&mut self.state, start)?;
		self.after_command();
		Ok(())
	}

	/// Record one delivery
	pub fn apply(&mut self, delivery: &Delivery) -> Result<DeliveryOutcome, ScoringError> {
		let outcome = engine::apply_delivery(&mut self.state, &mut self.stats, delivery)?;
		self.after_command();
		Ok(outcome)
	}

	pub fn apply_run(&mut self, runs: u32) -> Result<DeliveryOutcome, ScoringError> {
		self.apply(&Delivery::Run { runs })
	}

	pub fn apply_extra(
		&mut self,
		extra_type: ExtraType,
		total_runs: u32,
		batsman_runs: u32,
	) -> Result<DeliveryOutcome, ScoringError> {
		self.apply(&Delivery::Extra {
			extra_type,
			total_runs,
			batsman_runs,
		})
	}

	pub fn apply_wicket(
		&mut self,
		dismissal: DismissalType,
		fielder_id: Option<&str>,
		replacement_id: Option<&str>,
	) -> Result<DeliveryOutcome, ScoringError> {
		self.apply(&Delivery::Wicket {
			dismissal,
			fielder_id: fielder_id.map(str::to_string),
			replacement_id: replacement_id.map(str::to_string),
		})
	}

	pub fn select_bowler(&mut self, bowler_id: &str) -> Result<(), ScoringError> {
		rotation::select_bowler(&mut self.state, &self.stats, bowler_id)?;
		self.after_command();
		Ok(())
	}

	pub fn undo_last_delivery(&mut self) -> Result<DeliveryRecord, ScoringError> {
		let record = undo::undo_last_delivery(&mut self.state, &mut self.stats)?;
		self.after_command();
		Ok(record)
	}

	pub fn end_innings_manually(&mut self) -> Result<(), ScoringError> {
		lifecycle::end_innings_manually(&mut self.state, &mut self.stats)?;
		self.after_command();
		Ok(())
	}

	/// Read-only view for rendering
	pub fn match_state(&self) -> &MatchState {
		&self.state
	}

	pub fn stats(&self) -> &StatsAggregator {
		&self.stats
	}

	pub fn scorecard(&self) -> Scorecard {
		scorecard::build(&self.state, &self.stats)
	}

	/// Set once the match is completed
	pub fn man_of_the_match(&self) -> Option<&MomAward> {
		self.state.man_of_the_match.as_ref()
	}

	pub fn mom_ranking(&self) -> MomRanking {
		mom::rank(&self.state, &self.stats)
	}

	/// Push the completed match again if an earlier upload failed
	pub fn retry_sync(&mut self) -> Option<SyncTrigger> {
		let coordinator = self.sync.as_mut()?;
		let record = sync::build_completed_match(&self.state, &self.stats)?;
		Some(coordinator.trigger(record))
	}

	pub fn is_synced(&self) -> bool {
		self.synced_on_record || self.sync.as_ref().is_some_and(SyncCoordinator::is_synced)
	}

	/// Block until a running sync has finished, then record a success
	pub fn wait_for_sync(&mut self) {
		let Some(coordinator) = self.sync.as_mut() else {
			return;
		};
		coordinator.wait_idle();
		if coordinator.is_synced() && !self.synced_on_record {
			self.persist();
		}
	}

	/// Wait for a running sync to finish, then drop the match
	pub fn shutdown(mut self) {
		self.wait_for_sync();
		info!(
			target: "engine",
			match_id = %self.state.match_id,
			phase = %self.state.phase,
			"Match closed"
		);
	}

	fn persist(&mut self) {
		let synced = self.is_synced();
		let Some(store) = self.store.as_mut() else {
			return;
		};

		let record = PersistedMatch::new(&self.state, &self.stats).with_synced(synced);
		match store.save(&record) {
			Ok(()) => self.synced_on_record = synced,
			Err(e) => error!(
				target: "store",
				match_id = %self.state.match_id,
				error = %e,
				"Failed to persist match"
			),
		}
	}

	fn after_command(&mut self) {
		self.persist();

		if self.state.phase == Phase::Completed {
			self.retry_sync();
		}
	}
}
