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

//! Per-player match statistics
//!
//! The aggregator is the single owner of every player's batting and bowling
//! figures. Players are keyed by id only, never by team membership, so a
//! player's figures cannot diverge between "current bowler" and "member of
//! the fielding side" views.

use std::collections::BTreeMap;

use crease_sdk::types::PlayerId;
use serde::{Deserialize, Serialize};

use crate::types::BALLS_PER_OVER;

/// Batting figures of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingStats {
	pub runs: u32,
	pub balls_faced: u32,
	pub fours: u32,
	pub sixes: u32,
}

impl BattingStats {
	/// Runs per hundred balls, `None` before the first ball faced
	pub fn strike_rate(&self) -> Option<f64> {
		(self.balls_faced > 0).then(|| self.runs as f64 * 100.0 / self.balls_faced as f64)
	}
}

/// Bowling figures of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingStats {
	pub runs_conceded: u32,
	/// Legal deliveries only
	pub balls_bowled: u32,
	pub wickets: u32,
	pub maidens: u32,
}

impl BowlingStats {
	/// Runs conceded per six balls, `None` before the first legal delivery
	pub fn economy_rate(&self) -> Option<f64> {
		(self.balls_bowled > 0)
			.then(|| self.runs_conceded as f64 * BALLS_PER_OVER as f64 / self.balls_bowled as f64)
	}

	/// Runs conceded per wicket, undefined without a wicket
	pub fn bowling_average(&self) -> Option<f64> {
		(self.wickets > 0).then(|| self.runs_conceded as f64 / self.wickets as f64)
	}

	pub fn completed_overs(&self) -> u32 {
		self.balls_bowled / BALLS_PER_OVER
	}

	/// Overs bowled in `O.B` notation
	pub fn overs(&self) -> String {
		overs_notation(self.balls_bowled)
	}
}

/// Formats a legal-ball count as overs, e.g. 46 balls -> `"7.4"`
pub fn overs_notation(legal_balls: u32) -> String {
	format!(
		"{}.{}",
		legal_balls / BALLS_PER_OVER,
		legal_balls % BALLS_PER_OVER
	)
}

/// Runs per dismissal, undefined for a batsman never dismissed
pub fn batting_average(runs: u32, dismissals: u32) -> Option<f64> {
	(dismissals > 0).then(|| runs as f64 / dismissals as f64)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatchStats {
	pub batting: BattingStats,
	pub bowling: BowlingStats,
}

/// Owner of the per-player statistics dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsAggregator {
	players: BTreeMap<PlayerId, PlayerMatchStats>,
}

impl StatsAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn from_map(players: BTreeMap<PlayerId, PlayerMatchStats>) -> Self {
		Self { players }
	}

	pub fn get(&self, player_id: &str) -> Option<&PlayerMatchStats> {
		self.players.get(player_id)
	}

	/// Figures for a player, zeroed if they have not been involved yet
	pub fn of(&self, player_id: &str) -> PlayerMatchStats {
		self.players.get(player_id).copied().unwrap_or_default()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerMatchStats)> {
		self.players.iter()
	}

	pub fn as_map(&self) -> &BTreeMap<PlayerId, PlayerMatchStats> {
		&self.players
	}

	fn entry(&mut self, player_id: &str) -> &mut PlayerMatchStats {
		self.players.entry(player_id.to_string()).or_default()
	}

	/// Striker faces a delivery and is credited `runs` off the bat
	pub(crate) fn record_ball_faced(&mut self, striker_id: &str, runs: u32) {
		let batting = &mut self.entry(striker_id).batting;
		batting.balls_faced += 1;
		batting.runs += runs;
		match runs {
			4 => batting.fours += 1,
			6 => batting.sixes += 1,
			_ => {}
		}
	}

	/// Bowler is charged `runs`; `legal` counts the ball in their analysis
	pub(crate) fn record_bowled(&mut self, bowler_id: &str, runs: u32, legal: bool) {
		let bowling = &mut self.entry(bowler_id).bowling;
		bowling.runs_conceded += runs;
		if legal {
			bowling.balls_bowled += 1;
		}
	}

	pub(crate) fn credit_wicket(&mut self, bowler_id: &str) {
		self.entry(bowler_id).bowling.wickets += 1;
	}

	pub(crate) fn credit_maiden(&mut self, bowler_id: &str) {
		self.entry(bowler_id).bowling.maidens += 1;
	}

	/// Zero the bowling figures of every listed player, leaving batting intact
	pub(crate) fn reset_bowling<'a>(&mut self, player_ids: impl IntoIterator<Item = &'a str>) {
		for player_id in player_ids {
			if let Some(stats) = self.players.get_mut(player_id) {
				stats.bowling = BowlingStats::default();
			}
		}
	}
}
