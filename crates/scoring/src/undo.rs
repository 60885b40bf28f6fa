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

//! Delivery rollback
//!
//! Every delivery carries a snapshot of the complete mutable match state
//! taken just before it was applied. Undo pops the newest record and puts
//! that snapshot back, so repeated calls walk the innings back ball by ball.
//!
//! Undo is confined to the innings in play. During the innings break the
//! innings that just finished still counts as the one in play, which lets
//! the scorer take back the ball that ended it. Once the next innings has
//! started, or the match is completed, earlier records are frozen.

use std::collections::BTreeMap;

use crease_sdk::types::PlayerId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
	engine::{InningsScore, MatchState},
	mom::MomAward,
	stats::{PlayerMatchStats, StatsAggregator},
	types::{DeliveryRecord, MatchResult, Phase, ScoringError},
};

/// Mutable match state captured before a delivery
///
/// The ball log itself is not part of the snapshot; undo restores it by
/// popping the record that owns this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
	pub innings: [InningsScore; 2],
	pub current_innings_number: u8,
	pub batting_team_index: usize,
	pub target: Option<u32>,
	pub current_bowler_id: Option<PlayerId>,
	pub previous_over_bowler_id: Option<PlayerId>,
	pub phase: Phase,
	pub result: Option<MatchResult>,
	pub man_of_the_match: Option<MomAward>,
	pub stats: BTreeMap<PlayerId, PlayerMatchStats>,
}

impl StateSnapshot {
	pub fn capture(state: &MatchState, stats: &StatsAggregator) -> Self {
		Self {
			innings: state.innings.clone(),
			current_innings_number: state.current_innings_number,
			batting_team_index: state.batting_team_index,
			target: state.target,
			current_bowler_id: state.current_bowler_id.clone(),
			previous_over_bowler_id: state.previous_over_bowler_id.clone(),
			phase: state.phase,
			result: state.result.clone(),
			man_of_the_match: state.man_of_the_match.clone(),
			stats: stats.as_map().clone(),
		}
	}

	fn restore(self, state: &mut MatchState, stats: &mut StatsAggregator) {
		state.innings = self.innings;
		state.current_innings_number = self.current_innings_number;
		state.batting_team_index = self.batting_team_index;
		state.target = self.target;
		state.current_bowler_id = self.current_bowler_id;
		state.previous_over_bowler_id = self.previous_over_bowler_id;
		state.phase = self.phase;
		state.result = self.result;
		state.man_of_the_match = self.man_of_the_match;
		*stats = StatsAggregator::from_map(self.stats);
	}
}

/// Innings whose records may still be rolled back
fn undoable_innings(state: &MatchState) -> u8 {
	if state.phase == Phase::InningsBreak {
		state.current_innings_number.saturating_sub(1).max(1)
	} else {
		state.current_innings_number
	}
}

/// Roll back the most recent delivery of the innings in play
///
/// Returns the discarded record.
pub fn undo_last_delivery(
	state: &mut MatchState,
	stats: &mut StatsAggregator,
) -> Result<DeliveryRecord, ScoringError> {
	if state.phase == Phase::Completed {
		return Err(ScoringError::state("undo a delivery", state.phase));
	}

	let innings = undoable_innings(state);
	if state.ball_log.last().is_none_or(|r| r.innings != innings) {
		return Err(ScoringError::UndoNoOp);
	}

	let record = state.ball_log.pop().ok_or(ScoringError::UndoNoOp)?;
	record.snapshot.clone().restore(state, stats);

	info!(
		target: "undo",
		sequence = record.sequence,
		innings = record.innings,
		over = record.over,
		ball = record.ball_in_over,
		"Delivery undone"
	);

	Ok(record)
}
