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

use crease_sdk::types::{DismissalType, ExtraType, PlayerId, TeamId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::undo::StateSnapshot;

/// Balls in one over
pub const BALLS_PER_OVER: u32 = 6;

/// Upper bound on runs taken off a single delivery, excluding penalties
pub const MAX_RUNS_PER_BALL: u32 = 6;

/// Phase of the match state machine
///
/// Scoring commands are only accepted while `Active`. Every other phase is a
/// rejecting barrier that the caller resolves with an explicit command:
/// `start_innings` for `NotStarted`/`InningsBreak`, `select_bowler` for
/// `AwaitingBowlerSelection`. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	NotStarted,
	Active,
	AwaitingBowlerSelection,
	InningsBreak,
	Completed,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Phase::NotStarted => "not started",
			Phase::Active => "active",
			Phase::AwaitingBowlerSelection => "awaiting bowler selection",
			Phase::InningsBreak => "at the innings break",
			Phase::Completed => "completed",
		};
		f.write_str(label)
	}
}

/// Playing conditions fixed at toss time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
	/// Overs per innings
	pub overs_limit: u32,
	/// Penalty runs awarded for a wide
	pub wide_penalty: u32,
	/// Penalty runs awarded for a no-ball
	pub no_ball_penalty: u32,
	/// Let the last remaining batsman bat on alone
	pub last_man_standing: bool,
	/// Maximum overs a single bowler may bowl in an innings
	pub max_overs_per_bowler: Option<u32>,
}

impl Default for MatchRules {
	fn default() -> Self {
		Self {
			overs_limit: 20,
			wide_penalty: 1,
			no_ball_penalty: 1,
			last_man_standing: true,
			max_overs_per_bowler: None,
		}
	}
}

impl MatchRules {
	pub fn with_overs(overs_limit: u32) -> Self {
		Self {
			overs_limit,
			..Self::default()
		}
	}

	/// Penalty attached to an extra of the given type
	pub fn penalty_for(&self, extra_type: ExtraType) -> u32 {
		match extra_type {
			ExtraType::Wide => self.wide_penalty,
			ExtraType::NoBall => self.no_ball_penalty,
			ExtraType::Bye | ExtraType::LegBye => 0,
		}
	}
}

/// Running extras tally of an innings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtrasTally {
	pub wide: u32,
	pub no_ball: u32,
	pub bye: u32,
	pub leg_bye: u32,
}

impl ExtrasTally {
	pub fn total(&self) -> u32 {
		self.wide + self.no_ball + self.bye + self.leg_bye
	}

	pub fn add(&mut self, extra_type: ExtraType, runs: u32) {
		match extra_type {
			ExtraType::Wide => self.wide += runs,
			ExtraType::NoBall => self.no_ball += runs,
			ExtraType::Bye => self.bye += runs,
			ExtraType::LegBye => self.leg_bye += runs,
		}
	}
}

/// One fall of wicket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WicketRecord {
	/// 1-based wicket number within the innings
	pub wicket_number: u32,
	pub batsman_id: PlayerId,
	pub dismissal: DismissalType,
	/// `None` for run outs
	pub bowler_id: Option<PlayerId>,
	pub fielder_id: Option<PlayerId>,
	pub team_score_at_fall: u32,
	/// Overs in `O.B` notation at the moment of dismissal
	pub over_at_fall: String,
}

/// A recorded delivery
///
/// Records are appended to the ball log in bowling order. The attached
/// snapshot is the full match state immediately before this delivery was
/// applied and is only ever consumed by undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
	/// 1-based position in the ball log
	pub sequence: u64,
	/// Innings number (1 or 2)
	pub innings: u8,
	/// Completed overs before this delivery
	pub over: u32,
	/// Ball number within the over (extras repeat the number)
	pub ball_in_over: u32,
	pub batsman_id: PlayerId,
	pub non_striker_id: PlayerId,
	pub bowler_id: PlayerId,
	/// Runs off the delivery excluding penalty runs
	pub runs_scored: u32,
	/// Part of `runs_scored` credited to the striker
	pub batsman_runs: u32,
	/// Penalty runs for a wide or no-ball
	pub penalty_runs: u32,
	pub extra_type: Option<ExtraType>,
	pub is_wicket: bool,
	pub dismissal: Option<DismissalType>,
	pub fielder_id: Option<PlayerId>,
	pub snapshot: StateSnapshot,
}

impl DeliveryRecord {
	/// Everything this delivery added to the team total
	pub fn total_runs(&self) -> u32 {
		self.runs_scored + self.penalty_runs
	}

	/// Whether the delivery counts toward the six balls of an over
	pub fn is_legal(&self) -> bool {
		self.extra_type.is_none_or(ExtraType::counts_as_ball)
	}

	/// Runs charged to the bowler
	pub fn bowler_runs(&self) -> u32 {
		match self.extra_type {
			None => self.runs_scored,
			Some(extra) if extra.charged_to_bowler() => self.total_runs(),
			Some(_) => 0,
		}
	}
}

/// How a match was won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Margin {
	/// Chasing side reached the target
	Wickets { wickets: u32, balls_remaining: u32 },
	/// Side batting first defended its total
	Runs { runs: u32 },
}

fn plural(n: u32, word: &str) -> String {
	if n == 1 {
		format!("{} {}", n, word)
	} else {
		format!("{} {}s", n, word)
	}
}

impl fmt::Display for Margin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Margin::Wickets {
				wickets,
				balls_remaining,
			} => write!(
				f,
				"{}, {} remaining",
				plural(*wickets, "wicket"),
				plural(*balls_remaining, "ball")
			),
			Margin::Runs { runs } => f.write_str(&plural(*runs, "run")),
		}
	}
}

/// Final result of a completed match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
	Won {
		team_index: usize,
		team_id: TeamId,
		margin: Margin,
	},
	Tie,
}

impl MatchResult {
	pub fn winner_index(&self) -> Option<usize> {
		match self {
			MatchResult::Won { team_index, .. } => Some(*team_index),
			MatchResult::Tie => None,
		}
	}

	/// Result line for display, e.g. `"Lions won by 7 wickets, 14 balls remaining"`
	pub fn summary(&self, team_names: [&str; 2]) -> String {
		match self {
			MatchResult::Won {
				team_index, margin, ..
			} => format!("{} won by {}", team_names[*team_index], margin),
			MatchResult::Tie => "Match tied".to_string(),
		}
	}
}

/// What happened as a result of applying one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
	pub sequence: u64,
	pub over_completed: bool,
	pub innings_ended: bool,
	pub match_completed: bool,
	pub awaiting_bowler: bool,
	pub last_man_standing: bool,
}

/// Rejected input: the command is malformed or breaks a playing rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("Invalid match setup: {0}")]
	InvalidSetup(String),
	#[error("Unknown team: {0}")]
	UnknownTeam(TeamId),
	#[error("Batting and bowling side must differ")]
	SameTeam,
	#[error("Wrong batting side: expected {expected}, got {got}")]
	WrongBattingSide { expected: TeamId, got: TeamId },
	#[error("Striker and non-striker must be different players")]
	SameOpeners,
	#[error("Player {0} is not in the batting side")]
	NotInBattingSide(PlayerId),
	#[error("Player {0} is not in the bowling side")]
	NotInBowlingSide(PlayerId),
	#[error("No fielder takes part in a {0} dismissal")]
	UnexpectedFielder(DismissalType),
	#[error("Bowler {0} bowled the previous over")]
	ConsecutiveOvers(PlayerId),
	#[error("Bowler {bowler} has already bowled {overs} overs")]
	BowlerQuotaExhausted { bowler: PlayerId, overs: u32 },
	#[error("Striker, non-striker and bowler must all be assigned")]
	MissingParticipants,
	#[error("Invalid runs: {0}")]
	InvalidRuns(String),
	#[error("A replacement batsman must be chosen")]
	ReplacementRequired,
	#[error("Player {0} cannot come in to bat")]
	IneligibleReplacement(PlayerId),
}

/// Command issued in a phase that does not accept it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot {action} while the match is {phase}")]
pub struct StateError {
	pub action: &'static str,
	pub phase: Phase,
}

/// Error types for scoring commands
///
/// Every variant guarantees that the match state was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
	#[error("Validation error: {0}")]
	Validation(#[from] ValidationError),
	#[error("State error: {0}")]
	State(#[from] StateError),
	#[error("Nothing to undo in the current innings")]
	UndoNoOp,
}

impl ScoringError {
	pub(crate) fn state(action: &'static str, phase: Phase) -> Self {
		ScoringError::State(StateError { action, phase })
	}

	/// Scoring is blocked until a bowler is selected
	pub fn is_blocked(&self) -> bool {
		matches!(
			self,
			ScoringError::State(StateError {
				phase: Phase::AwaitingBowlerSelection,
				..
			})
		)
	}
}
