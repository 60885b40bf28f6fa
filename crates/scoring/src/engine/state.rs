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

use crease_sdk::types::{PlayerId, Team};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	mom::MomAward,
	stats::overs_notation,
	types::{
		BALLS_PER_OVER, DeliveryRecord, ExtrasTally, MatchResult, MatchRules, Phase, WicketRecord,
	},
};

/// Score of one innings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsScore {
	/// Index into `MatchState::teams` of the side batting
	pub batting_team: usize,
	/// Index into `MatchState::teams` of the side bowling
	pub bowling_team: usize,
	pub runs: u32,
	pub wickets: u32,
	pub overs_completed: u32,
	/// Legal deliveries in the current over, always below six
	pub balls_in_current_over: u32,
	pub striker_id: Option<PlayerId>,
	pub non_striker_id: Option<PlayerId>,
	pub extras: ExtrasTally,
	pub fall_of_wickets: Vec<WicketRecord>,
	/// Batsmen in order of arrival at the crease
	pub batting_order: Vec<PlayerId>,
	pub dismissed: Vec<PlayerId>,
	/// Sole remaining batsman holds both ends
	pub last_man_standing: bool,
	pub all_out: bool,
	/// Runs charged to the bowler in the over in progress
	pub runs_conceded_this_over: u32,
	pub started: bool,
}

impl InningsScore {
	pub fn new(batting_team: usize, bowling_team: usize) -> Self {
		Self {
			batting_team,
			bowling_team,
			runs: 0,
			wickets: 0,
			overs_completed: 0,
			balls_in_current_over: 0,
			striker_id: None,
			non_striker_id: None,
			extras: ExtrasTally::default(),
			fall_of_wickets: Vec::new(),
			batting_order: Vec::new(),
			dismissed: Vec::new(),
			last_man_standing: false,
			all_out: false,
			runs_conceded_this_over: 0,
			started: false,
		}
	}

	/// Legal deliveries bowled so far
	pub fn legal_balls(&self) -> u32 {
		self.overs_completed * BALLS_PER_OVER + self.balls_in_current_over
	}

	/// Overs in `O.B` notation
	pub fn overs(&self) -> String {
		overs_notation(self.legal_balls())
	}

	pub fn is_at_crease(&self, player_id: &str) -> bool {
		self.striker_id.as_deref() == Some(player_id)
			|| self.non_striker_id.as_deref() == Some(player_id)
	}

	pub fn is_dismissed(&self, player_id: &str) -> bool {
		self.dismissed.iter().any(|p| p == player_id)
	}

	/// Swap ends, unless a lone batsman holds both
	pub(crate) fn rotate_strike(&mut self) {
		if !self.last_man_standing {
			std::mem::swap(&mut self.striker_id, &mut self.non_striker_id);
		}
	}
}

/// Complete state of one match
///
/// `teams` and `rules` are fixed at toss time; everything else is mutated
/// only through the engine, rotation, lifecycle and undo modules. Innings
/// are indexed by innings number (`innings[0]` is the first innings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
	pub match_id: Uuid,
	pub teams: [Team; 2],
	pub rules: MatchRules,
	pub innings: [InningsScore; 2],
	/// 1 or 2
	pub current_innings_number: u8,
	/// Index into `teams` of the side currently (or next) batting
	pub batting_team_index: usize,
	pub total_overs_limit: u32,
	pub target: Option<u32>,
	pub ball_log: Vec<DeliveryRecord>,
	pub current_bowler_id: Option<PlayerId>,
	/// Bowler who completed the most recent over
	pub previous_over_bowler_id: Option<PlayerId>,
	pub phase: Phase,
	pub result: Option<MatchResult>,
	pub man_of_the_match: Option<MomAward>,
}

impl MatchState {
	pub fn new(match_id: Uuid, teams: [Team; 2], rules: MatchRules) -> Self {
		let total_overs_limit = rules.overs_limit;
		Self {
			match_id,
			teams,
			rules,
			innings: [InningsScore::new(0, 1), InningsScore::new(1, 0)],
			current_innings_number: 1,
			batting_team_index: 0,
			total_overs_limit,
			target: None,
			ball_log: Vec::new(),
			current_bowler_id: None,
			previous_over_bowler_id: None,
			phase: Phase::NotStarted,
			result: None,
			man_of_the_match: None,
		}
	}

	pub fn current_innings(&self) -> &InningsScore {
		&self.innings[self.current_innings_index()]
	}

	pub(crate) fn current_innings_mut(&mut self) -> &mut InningsScore {
		let index = self.current_innings_index();
		&mut self.innings[index]
	}

	pub fn current_innings_index(&self) -> usize {
		usize::from(self.current_innings_number.saturating_sub(1)).min(1)
	}

	pub fn batting_team(&self) -> &Team {
		&self.teams[self.current_innings().batting_team]
	}

	pub fn bowling_team(&self) -> &Team {
		&self.teams[self.current_innings().bowling_team]
	}

	pub fn team_index(&self, team_id: &str) -> Option<usize> {
		self.teams.iter().position(|t| t.id == team_id)
	}

	/// Deliveries recorded in the given innings
	pub fn deliveries_in(&self, innings: u8) -> impl Iterator<Item = &DeliveryRecord> {
		self.ball_log.iter().filter(move |r| r.innings == innings)
	}

	/// Batsmen of the current batting side who may still come in
	pub fn available_batsmen(&self) -> Vec<&str> {
		let innings = self.current_innings();
		self.teams[innings.batting_team]
			.players
			.iter()
			.map(|p| p.id.as_str())
			.filter(|id| !innings.is_dismissed(id) && !innings.is_at_crease(id))
			.collect()
	}

	/// Legal balls left in the current innings
	pub fn balls_remaining(&self) -> u32 {
		let limit = self.total_overs_limit * BALLS_PER_OVER;
		limit.saturating_sub(self.current_innings().legal_balls())
	}

	/// Display names of both teams in `teams` order
	pub fn team_names(&self) -> [&str; 2] {
		[self.teams[0].name.as_str(), self.teams[1].name.as_str()]
	}
}
