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

//! Bowler rotation
//!
//! `Active -> (over completed) -> AwaitingBowlerSelection -> (valid bowler) -> Active`
//!
//! The same barrier is raised when an innings starts without a bowler.
//! While it is up, the engine rejects every delivery.

use tracing::{debug, info};

use crate::{
	engine::MatchState,
	stats::StatsAggregator,
	types::{Phase, ScoringError, ValidationError},
};

/// Check that `bowler_id` may bowl the next over
pub fn validate_bowler(
	state: &MatchState,
	stats: &StatsAggregator,
	bowler_id: &str,
) -> Result<(), ValidationError> {
	if !state.bowling_team().contains(bowler_id) {
		return Err(ValidationError::NotInBowlingSide(bowler_id.to_string()));
	}

	if state.previous_over_bowler_id.as_deref() == Some(bowler_id) {
		return Err(ValidationError::ConsecutiveOvers(bowler_id.to_string()));
	}

	if let Some(max_overs) = state.rules.max_overs_per_bowler {
		let bowled = stats.of(bowler_id).bowling.completed_overs();
		if bowled >= max_overs {
			return Err(ValidationError::BowlerQuotaExhausted {
				bowler: bowler_id.to_string(),
				overs: bowled,
			});
		}
	}

	Ok(())
}

/// Raise the barrier after an over is completed
pub(crate) fn on_over_completed(state: &mut MatchState) {
	state.previous_over_bowler_id = state.current_bowler_id.clone();
	state.phase = Phase::AwaitingBowlerSelection;
	debug!(
		target: "engine",
		bowler = ?state.previous_over_bowler_id,
		overs = state.current_innings().overs_completed,
		"Over completed, awaiting bowler selection"
	);
}

/// Choose the bowler for the next over and lower the barrier
pub fn select_bowler(
	state: &mut MatchState,
	stats: &StatsAggregator,
	bowler_id: &str,
) -> Result<(), ScoringError> {
	if state.phase != Phase::AwaitingBowlerSelection {
		return Err(ScoringError::state("select a bowler", state.phase));
	}

	validate_bowler(state, stats, bowler_id)?;

	state.current_bowler_id = Some(bowler_id.to_string());
	state.phase = Phase::Active;

	info!(
		target: "engine",
		bowler = bowler_id,
		over = state.current_innings().overs_completed + 1,
		"Bowler selected"
	);

	Ok(())
}
