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

//! Rendered scorecard
//!
//! Derived on demand from the match state and the statistics dictionary,
//! never stored.

use crease_sdk::types::{DismissalType, PlayerId, Team, TeamId};
use serde::Serialize;
use uuid::Uuid;

use crate::{
	engine::{InningsScore, MatchState},
	mom::MomAward,
	stats::StatsAggregator,
	types::{BALLS_PER_OVER, ExtrasTally, Phase, WicketRecord},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingRow {
	pub player_id: PlayerId,
	pub name: String,
	/// e.g. `"c Smith b Jones"` or `"not out"`
	pub dismissal: String,
	pub runs: u32,
	pub balls: u32,
	pub fours: u32,
	pub sixes: u32,
	pub strike_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingRow {
	pub player_id: PlayerId,
	pub name: String,
	pub overs: String,
	pub maidens: u32,
	pub runs: u32,
	pub wickets: u32,
	pub economy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallOfWicketRow {
	pub wicket_number: u32,
	pub batsman: String,
	pub score: u32,
	pub over: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsCard {
	pub innings: u8,
	pub batting_team_id: TeamId,
	pub batting_team: String,
	pub runs: u32,
	pub wickets: u32,
	pub overs: String,
	pub run_rate: Option<f64>,
	pub extras: ExtrasTally,
	pub batting: Vec<BattingRow>,
	pub did_not_bat: Vec<String>,
	pub bowling: Vec<BowlingRow>,
	pub fall_of_wickets: Vec<FallOfWicketRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
	pub match_id: Uuid,
	pub phase: Phase,
	pub target: Option<u32>,
	pub innings: Vec<InningsCard>,
	pub result: Option<String>,
	pub man_of_the_match: Option<MomAward>,
}

fn name_of<'a>(teams: &'a [Team; 2], player_id: &'a str) -> &'a str {
	teams
		.iter()
		.find_map(|t| t.player(player_id))
		.map_or(player_id, |p| p.name.as_str())
}

/// Conventional scorecard notation for a dismissal
fn dismissal_text(teams: &[Team; 2], wicket: &WicketRecord) -> String {
	let bowler = wicket.bowler_id.as_deref().map(|id| name_of(teams, id));
	let fielder = wicket.fielder_id.as_deref().map(|id| name_of(teams, id));
	let bowler = bowler.unwrap_or("?");

	match wicket.dismissal {
		DismissalType::Bowled => format!("b {}", bowler),
		DismissalType::Lbw => format!("lbw b {}", bowler),
		DismissalType::HitWicket => format!("hit wicket b {}", bowler),
		DismissalType::Caught => match fielder {
			Some(fielder) if fielder != bowler => format!("c {} b {}", fielder, bowler),
			_ => format!("c & b {}", bowler),
		},
		DismissalType::Stumped => match fielder {
			Some(fielder) => format!("st {} b {}", fielder, bowler),
			None => format!("st b {}", bowler),
		},
		DismissalType::RunOut => match fielder {
			Some(fielder) => format!("run out ({})", fielder),
			None => "run out".to_string(),
		},
	}
}

fn innings_card(
	state: &MatchState,
	stats: &StatsAggregator,
	number: u8,
	score: &InningsScore,
) -> InningsCard {
	let teams = &state.teams;
	let batting_side = &teams[score.batting_team];

	let batting = score
		.batting_order
		.iter()
		.map(|id| {
			let figures = stats.of(id).batting;
			let dismissal = score
				.fall_of_wickets
				.iter()
				.find(|w| &w.batsman_id == id)
				.map_or_else(|| "not out".to_string(), |w| dismissal_text(teams, w));
			BattingRow {
				player_id: id.clone(),
				name: name_of(teams, id).to_string(),
				dismissal,
				runs: figures.runs,
				balls: figures.balls_faced,
				fours: figures.fours,
				sixes: figures.sixes,
				strike_rate: figures.strike_rate(),
			}
		})
		.collect();

	let did_not_bat = batting_side
		.players
		.iter()
		.filter(|p| !score.batting_order.contains(&p.id))
		.map(|p| p.name.clone())
		.collect();

	let mut bowlers: Vec<&str> = Vec::new();
	for record in state.deliveries_in(number) {
		if !bowlers.contains(&record.bowler_id.as_str()) {
			bowlers.push(&record.bowler_id);
		}
	}
	let bowling = bowlers
		.into_iter()
		.map(|id| {
			let figures = stats.of(id).bowling;
			BowlingRow {
				player_id: id.to_string(),
				name: name_of(teams, id).to_string(),
				overs: figures.overs(),
				maidens: figures.maidens,
				runs: figures.runs_conceded,
				wickets: figures.wickets,
				economy: figures.economy_rate(),
			}
		})
		.collect();

	let fall_of_wickets = score
		.fall_of_wickets
		.iter()
		.map(|w| FallOfWicketRow {
			wicket_number: w.wicket_number,
			batsman: name_of(teams, &w.batsman_id).to_string(),
			score: w.team_score_at_fall,
			over: w.over_at_fall.clone(),
		})
		.collect();

	let legal_balls = score.legal_balls();
	InningsCard {
		innings: number,
		batting_team_id: batting_side.id.clone(),
		batting_team: batting_side.name.clone(),
		runs: score.runs,
		wickets: score.wickets,
		overs: score.overs(),
		run_rate: (legal_balls > 0)
			.then(|| score.runs as f64 * BALLS_PER_OVER as f64 / legal_balls as f64),
		extras: score.extras,
		batting,
		did_not_bat,
		bowling,
		fall_of_wickets,
	}
}

/// Cards for every innings that has started
pub fn build(state: &MatchState, stats: &StatsAggregator) -> Scorecard {
	let innings = state
		.innings
		.iter()
		.enumerate()
		.filter(|(_, score)| score.started)
		.map(|(index, score)| innings_card(state, stats, index as u8 + 1, score))
		.collect();

	Scorecard {
		match_id: state.match_id,
		phase: state.phase,
		target: state.target,
		innings,
		result: state.result.as_ref().map(|r| r.summary(state.team_names())),
		man_of_the_match: state.man_of_the_match.clone(),
	}
}
