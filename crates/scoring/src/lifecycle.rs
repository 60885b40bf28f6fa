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

//! Innings lifecycle
//!
//! ```text
//! NotStarted --start_innings--> Active ... --innings end--> InningsBreak
//! InningsBreak --start_innings--> Active ... --innings end--> Completed
//! ```
//!
//! The first innings end sets the target and swaps roles. The second one
//! settles the result and the Man of the Match.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
	engine::{InningsScore, MatchState},
	mom,
	stats::StatsAggregator,
	types::{Margin, MatchResult, Phase, ScoringError, ValidationError},
};

/// Why an innings came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsEnd {
	AllOut,
	TargetReached,
	OversExhausted,
	/// Closed by the scorer
	Declared,
}

impl fmt::Display for InningsEnd {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			InningsEnd::AllOut => "all out",
			InningsEnd::TargetReached => "target reached",
			InningsEnd::OversExhausted => "overs exhausted",
			InningsEnd::Declared => "declared",
		};
		f.write_str(label)
	}
}

/// Openers and bowler chosen to start an innings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsStart {
	pub batting_team_id: String,
	pub bowling_team_id: String,
	pub striker_id: String,
	pub non_striker_id: String,
	/// Without an opening bowler the innings waits for `select_bowler`
	#[serde(default)]
	pub bowler_id: Option<String>,
}

fn resolve_team(state: &MatchState, team_id: &str) -> Result<usize, ValidationError> {
	state
		.team_index(team_id)
		.ok_or_else(|| ValidationError::UnknownTeam(team_id.to_string()))
}

/// Validate the openers and resolve the batting and bowling sides
fn validate_start(
	state: &MatchState,
	start: &InningsStart,
) -> Result<(usize, usize), ScoringError> {
	let batting = resolve_team(state, &start.batting_team_id)?;
	let bowling = resolve_team(state, &start.bowling_team_id)?;
	if batting == bowling {
		return Err(ValidationError::SameTeam.into());
	}

	if state.phase == Phase::InningsBreak && batting != state.batting_team_index {
		return Err(ValidationError::WrongBattingSide {
			expected: state.teams[state.batting_team_index].id.clone(),
			got: start.batting_team_id.clone(),
		}
		.into());
	}

	if start.striker_id == start.non_striker_id {
		return Err(ValidationError::SameOpeners.into());
	}

	for opener in [&start.striker_id, &start.non_striker_id] {
		if !state.teams[batting].contains(opener) {
			return Err(ValidationError::NotInBattingSide(opener.clone()).into());
		}
	}

	if let Some(bowler) = &start.bowler_id
		&& !state.teams[bowling].contains(bowler)
	{
		return Err(ValidationError::NotInBowlingSide(bowler.clone()).into());
	}

	Ok((batting, bowling))
}

/// Start the first innings, or the second one from the innings break
pub fn start_innings(state: &mut MatchState, start: &InningsStart) -> Result<(), ScoringError> {
	if !matches!(state.phase, Phase::NotStarted | Phase::InningsBreak) {
		return Err(ScoringError::state("start an innings", state.phase));
	}

	let (batting, bowling) = validate_start(state, start)?;

	if state.phase == Phase::NotStarted {
		state.innings = [
			InningsScore::new(batting, bowling),
			InningsScore::new(bowling, batting),
		];
		state.batting_team_index = batting;
	}

	let innings = state.current_innings_mut();
	innings.striker_id = Some(start.striker_id.clone());
	innings.non_striker_id = Some(start.non_striker_id.clone());
	innings.batting_order = vec![start.striker_id.clone(), start.non_striker_id.clone()];
	innings.started = true;

	state.current_bowler_id = start.bowler_id.clone();
	state.previous_over_bowler_id = None;
	state.phase = if start.bowler_id.is_some() {
		Phase::Active
	} else {
		Phase::AwaitingBowlerSelection
	};

	info!(
		target: "lifecycle",
		innings = state.current_innings_number,
		batting = %start.batting_team_id,
		striker = %start.striker_id,
		non_striker = %start.non_striker_id,
		bowler = ?start.bowler_id,
		target = ?state.target,
		"Innings started"
	);

	Ok(())
}

/// Whether the innings in play has reached an end condition
pub fn innings_end_reason(state: &MatchState) -> Option<InningsEnd> {
	let innings = state.current_innings();
	if innings.all_out {
		Some(InningsEnd::AllOut)
	} else if state.current_innings_number == 2 && state.target.is_some_and(|t| innings.runs >= t)
	{
		Some(InningsEnd::TargetReached)
	} else if innings.overs_completed >= state.total_overs_limit {
		Some(InningsEnd::OversExhausted)
	} else {
		None
	}
}

/// Close the innings in play
pub(crate) fn end_innings(state: &mut MatchState, stats: &mut StatsAggregator, reason: InningsEnd) {
	let number = state.current_innings_number;
	{
		let innings = state.current_innings();
		info!(
			target: "lifecycle",
			innings = number,
			%reason,
			runs = innings.runs,
			wickets = innings.wickets,
			overs = %innings.overs(),
			"Innings ended"
		);
	}

	if number == 1 {
		let target = state.innings[0].runs + 1;
		state.target = Some(target);
		state.current_innings_number = 2;
		state.batting_team_index = state.innings[1].batting_team;

		let new_bowling_side = &state.teams[state.innings[1].bowling_team];
		stats.reset_bowling(new_bowling_side.players.iter().map(|p| p.id.as_str()));

		state.current_bowler_id = None;
		state.previous_over_bowler_id = None;
		state.phase = Phase::InningsBreak;

		info!(target: "lifecycle", target, "Innings break");
		return;
	}

	state.phase = Phase::Completed;
	let result = compute_result(state);
	info!(
		target: "lifecycle",
		match_id = %state.match_id,
		result = %result.summary(state.team_names()),
		"Match completed"
	);
	state.result = Some(result);
	state.man_of_the_match = mom::award(state, stats);
}

/// Close the innings in play on the scorer's instruction
pub fn end_innings_manually(
	state: &mut MatchState,
	stats: &mut StatsAggregator,
) -> Result<(), ScoringError> {
	if !matches!(state.phase, Phase::Active | Phase::AwaitingBowlerSelection) {
		return Err(ScoringError::state("end the innings", state.phase));
	}

	end_innings(state, stats, InningsEnd::Declared);
	Ok(())
}

/// Winner and margin from the two innings totals
pub fn compute_result(state: &MatchState) -> MatchResult {
	let [first, second] = &state.innings;

	if state.target.is_some_and(|t| second.runs >= t) {
		let chasing = second.batting_team;
		let size = state.teams[chasing].size() as u32;
		// The last man standing is still a wicket in hand
		let wickets_in_hand = if second.last_man_standing {
			size.saturating_sub(second.wickets)
		} else {
			size.saturating_sub(1).saturating_sub(second.wickets)
		};
		return MatchResult::Won {
			team_index: chasing,
			team_id: state.teams[chasing].id.clone(),
			margin: Margin::Wickets {
				wickets: wickets_in_hand,
				balls_remaining: state.balls_remaining(),
			},
		};
	}

	let (winner, margin) = match first.runs.cmp(&second.runs) {
		std::cmp::Ordering::Greater => (first.batting_team, first.runs - second.runs),
		std::cmp::Ordering::Less => (second.batting_team, second.runs - first.runs),
		std::cmp::Ordering::Equal => return MatchResult::Tie,
	};

	MatchResult::Won {
		team_index: winner,
		team_id: state.teams[winner].id.clone(),
		margin: Margin::Runs { runs: margin },
	}
}
