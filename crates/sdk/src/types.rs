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

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Player identifier as issued by the roster provider
pub type PlayerId = String;

/// Team identifier as issued by the roster provider
pub type TeamId = String;

/// A rostered player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
	pub id: PlayerId,
	pub name: String,
}

impl Player {
	pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
		}
	}
}

/// A side as supplied by the roster provider
///
/// Roster order matters: it is the batting order suggestion shown to the
/// scorer and the scan order used to break Man-of-the-Match ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
	pub id: TeamId,
	pub name: String,
	pub players: Vec<Player>,
}

impl Team {
	pub fn new(id: impl Into<TeamId>, name: impl Into<String>, players: Vec<Player>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			players,
		}
	}

	pub fn contains(&self, player_id: &str) -> bool {
		self.players.iter().any(|p| p.id == player_id)
	}

	pub fn player(&self, player_id: &str) -> Option<&Player> {
		self.players.iter().find(|p| p.id == player_id)
	}

	pub fn size(&self) -> usize {
		self.players.len()
	}
}

/// Kind of extra conceded on a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
	Wide,
	NoBall,
	Bye,
	LegBye,
}

impl ExtraType {
	/// Whether the delivery counts toward the six balls of an over
	pub fn counts_as_ball(self) -> bool {
		matches!(self, ExtraType::Bye | ExtraType::LegBye)
	}

	/// Whether the runs are charged against the bowler's analysis
	pub fn charged_to_bowler(self) -> bool {
		matches!(self, ExtraType::Wide | ExtraType::NoBall)
	}
}

impl fmt::Display for ExtraType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			ExtraType::Wide => "wide",
			ExtraType::NoBall => "no-ball",
			ExtraType::Bye => "bye",
			ExtraType::LegBye => "leg-bye",
		};
		f.write_str(label)
	}
}

/// How a batsman was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalType {
	Bowled,
	Caught,
	Lbw,
	RunOut,
	Stumped,
	HitWicket,
}

impl DismissalType {
	/// Run outs are the only dismissal not credited to the bowler
	pub fn credited_to_bowler(self) -> bool {
		!matches!(self, DismissalType::RunOut)
	}

	/// Whether a fielder is part of the dismissal
	pub fn involves_fielder(self) -> bool {
		matches!(
			self,
			DismissalType::Caught | DismissalType::RunOut | DismissalType::Stumped
		)
	}
}

impl fmt::Display for DismissalType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			DismissalType::Bowled => "bowled",
			DismissalType::Caught => "caught",
			DismissalType::Lbw => "lbw",
			DismissalType::RunOut => "run out",
			DismissalType::Stumped => "stumped",
			DismissalType::HitWicket => "hit wicket",
		};
		f.write_str(label)
	}
}

/// One ball as entered by the scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Delivery {
	/// A legal delivery off the bat
	Run { runs: u32 },
	/// A wide, no-ball, bye or leg-bye
	///
	/// `total_runs` is everything added to the team total, including the
	/// penalty. `batsman_runs` is the part credited to the striker and is
	/// only meaningful for no-balls.
	Extra {
		extra_type: ExtraType,
		total_runs: u32,
		#[serde(default)]
		batsman_runs: u32,
	},
	/// The striker is dismissed
	Wicket {
		dismissal: DismissalType,
		#[serde(default)]
		fielder_id: Option<PlayerId>,
		#[serde(default)]
		replacement_id: Option<PlayerId>,
	},
}

/// Score line of one innings in a completed match record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsSummary {
	pub team_id: TeamId,
	pub runs: u32,
	pub wickets: u32,
	/// Overs in `O.B` notation, e.g. `"7.4"`
	pub overs: String,
}

/// One player's contribution to a completed match
///
/// Rows are upserted remotely keyed by `(match_id, player_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
	pub match_id: Uuid,
	pub player_id: PlayerId,
	pub team_id: TeamId,
	pub runs: u32,
	pub balls_faced: u32,
	pub fours: u32,
	pub sixes: u32,
	pub runs_conceded: u32,
	pub balls_bowled: u32,
	pub wickets: u32,
	pub maidens: u32,
	pub mom_score: f64,
}

/// Finished match as pushed to the remote sync endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMatch {
	pub match_id: Uuid,
	pub completed_at: DateTime<Utc>,
	pub overs_limit: u32,
	pub innings: Vec<InningsSummary>,
	/// `None` for a tie
	pub winner_team_id: Option<TeamId>,
	/// Human readable result, e.g. `"Lions won by 7 wickets, 14 balls remaining"`
	pub result: String,
	pub man_of_the_match: Option<PlayerId>,
	pub performances: Vec<PlayerPerformance>,
}

/// Acknowledgement returned by the sync endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAck {
	pub match_id: Uuid,
	pub rows_upserted: u32,
}
