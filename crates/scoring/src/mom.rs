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

//! Man of the Match scoring
//!
//! ```text
//! score = 1.0 * won
//!       + runs / 10
//!       + 0.25 * (balls_faced >= 10 && strike_rate > 100)
//!       + 1.0 * wickets
//!       + 0.5 * maidens
//!       + 0.5 * max(0, 7 - economy)      (only after a legal ball bowled)
//! ```

use crease_sdk::types::{PlayerId, TeamId};
use serde::{Deserialize, Serialize};

use crate::{engine::MatchState, stats::PlayerMatchStats, stats::StatsAggregator};

const WIN_BONUS: f64 = 1.0;
const RUNS_DIVISOR: f64 = 10.0;
const STRIKE_RATE_BONUS: f64 = 0.25;
const STRIKE_RATE_MIN_BALLS: u32 = 10;
const STRIKE_RATE_THRESHOLD: f64 = 100.0;
const WICKET_WEIGHT: f64 = 1.0;
const MAIDEN_WEIGHT: f64 = 0.5;
const ECONOMY_PAR: f64 = 7.0;
const ECONOMY_WEIGHT: f64 = 0.5;

/// The awarded player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomAward {
	pub player_id: PlayerId,
	pub team_id: TeamId,
	pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomEntry {
	pub player_id: PlayerId,
	pub name: String,
	pub team_id: TeamId,
	pub score: f64,
}

/// Every player of both sides, best score first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomRanking {
	pub entries: Vec<MomEntry>,
}

impl MomRanking {
	pub fn leader(&self) -> Option<&MomEntry> {
		self.entries.first()
	}
}

/// Weighted performance score of one player
pub fn score_player(figures: &PlayerMatchStats, won_match: bool) -> f64 {
	let batting = &figures.batting;
	let bowling = &figures.bowling;

	let mut score = 0.0;
	if won_match {
		score += WIN_BONUS;
	}

	score += batting.runs as f64 / RUNS_DIVISOR;
	if batting.balls_faced >= STRIKE_RATE_MIN_BALLS
		&& batting.strike_rate().is_some_and(|sr| sr > STRIKE_RATE_THRESHOLD)
	{
		score += STRIKE_RATE_BONUS;
	}

	score += bowling.wickets as f64 * WICKET_WEIGHT;
	score += bowling.maidens as f64 * MAIDEN_WEIGHT;
	if let Some(economy) = bowling.economy_rate() {
		score += (ECONOMY_PAR - economy).max(0.0) * ECONOMY_WEIGHT;
	}

	score
}

/// Rank all players, scanning the first side then the second in roster order
///
/// The sort is stable, so equal scores keep roster order and the first player
/// encountered stays ahead.
pub fn rank(state: &MatchState, stats: &StatsAggregator) -> MomRanking {
	let winner = state.result.as_ref().and_then(|r| r.winner_index());

	let mut entries: Vec<MomEntry> = state
		.teams
		.iter()
		.enumerate()
		.flat_map(|(index, team)| {
			team.players.iter().map(move |player| MomEntry {
				player_id: player.id.clone(),
				name: player.name.clone(),
				team_id: team.id.clone(),
				score: score_player(&stats.of(&player.id), winner == Some(index)),
			})
		})
		.collect();

	entries.sort_by(|a, b| b.score.total_cmp(&a.score));

	MomRanking { entries }
}

/// Highest-scoring player of the match
pub fn award(state: &MatchState, stats: &StatsAggregator) -> Option<MomAward> {
	rank(state, stats).leader().map(|entry| MomAward {
		player_id: entry.player_id.clone(),
		team_id: entry.team_id.clone(),
		score: entry.score,
	})
}
