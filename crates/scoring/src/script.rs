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

//! Scripted match replay
//!
//! A script is a JSON document holding both rosters and the scorer's
//! commands in order:
//!
//! ```json
//! {
//!   "teams": [ { "id": "lions", "name": "Lions", "players": [...] }, ... ],
//!   "overs_limit": 5,
//!   "commands": [
//!     { "command": "start_innings", "batting_team_id": "lions", "bowling_team_id": "tigers",
//!       "striker_id": "l1", "non_striker_id": "l2", "bowler_id": "t1" },
//!     { "command": "run", "runs": 4 },
//!     { "command": "extra", "extra_type": "wide", "total_runs": 1 },
//!     { "command": "wicket", "dismissal": "bowled", "replacement_id": "l3" },
//!     { "command": "select_bowler", "bowler_id": "t2" },
//!     { "command": "undo" }
//!   ]
//! }
//! ```

use crease_sdk::types::{DismissalType, ExtraType, PlayerId, Team};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{lifecycle::InningsStart, orchestrator::MatchOrchestrator, types::ScoringError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ScriptCommand {
	StartInnings(InningsStart),
	Run {
		runs: u32,
	},
	Extra {
		extra_type: ExtraType,
		total_runs: u32,
		#[serde(default)]
		batsman_runs: u32,
	},
	Wicket {
		dismissal: DismissalType,
		#[serde(default)]
		fielder_id: Option<PlayerId>,
		#[serde(default)]
		replacement_id: Option<PlayerId>,
	},
	SelectBowler {
		bowler_id: PlayerId,
	},
	Undo,
	EndInnings,
}

impl ScriptCommand {
	fn execute(&self, orchestrator: &mut MatchOrchestrator) -> Result<(), ScoringError> {
		match self {
			ScriptCommand::StartInnings(start) => orchestrator.start_innings(start),
			ScriptCommand::Run { runs } => orchestrator.apply_run(*runs).map(|_| ()),
			ScriptCommand::Extra {
				extra_type,
				total_runs,
				batsman_runs,
			} => orchestrator
				.apply_extra(*extra_type, *total_runs, *batsman_runs)
				.map(|_| ()),
			ScriptCommand::Wicket {
				dismissal,
				fielder_id,
				replacement_id,
			} => orchestrator
				.apply_wicket(*dismissal, fielder_id.as_deref(), replacement_id.as_deref())
				.map(|_| ()),
			ScriptCommand::SelectBowler { bowler_id } => orchestrator.select_bowler(bowler_id),
			ScriptCommand::Undo => orchestrator.undo_last_delivery().map(|_| ()),
			ScriptCommand::EndInnings => orchestrator.end_innings_manually(),
		}
	}
}

/// A complete match to replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScript {
	/// Fixed id, so repeated runs overwrite the same stored match
	#[serde(default)]
	pub match_id: Option<Uuid>,
	pub teams: [Team; 2],
	/// Falls back to the configured limit
	#[serde(default)]
	pub overs_limit: Option<u32>,
	pub commands: Vec<ScriptCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
	/// Position of the command in the script
	pub index: usize,
	pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
	pub applied: usize,
	pub rejected: Vec<Rejection>,
}

/// Feed every command to the orchestrator
///
/// Rejected commands are logged and skipped; the match carries on with the
/// next one, as it would with a scorer correcting a mistaken tap.
pub fn replay(orchestrator: &mut MatchOrchestrator, commands: &[ScriptCommand]) -> ReplayReport {
	let mut report = ReplayReport::default();

	for (index, command) in commands.iter().enumerate() {
		match command.execute(orchestrator) {
			Ok(()) => {
				report.applied += 1;
				debug!(target: "runner", index, ?command, "Command applied");
			}
			Err(e) => {
				warn!(target: "runner", index, ?command, error = %e, "Command rejected");
				report.rejected.push(Rejection {
					index,
					error: e.to_string(),
				});
			}
		}
	}

	report
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_command_wire_format() {
		let json = r#"[
			{"command": "start_innings", "batting_team_id": "a", "bowling_team_id": "b",
			 "striker_id": "a1", "non_striker_id": "a2"},
			{"command": "extra", "extra_type": "leg_bye", "total_runs": 2},
			{"command": "wicket", "dismissal": "run_out", "fielder_id": "b2"},
			{"command": "select_bowler", "bowler_id": "b1"},
			{"command": "undo"},
			{"command": "end_innings"}
		]"#;
		let commands: Vec<ScriptCommand> = serde_json::from_str(json).unwrap();

		assert_eq!(
			commands[0],
			ScriptCommand::StartInnings(InningsStart {
				batting_team_id: "a".to_string(),
				bowling_team_id: "b".to_string(),
				striker_id: "a1".to_string(),
				non_striker_id: "a2".to_string(),
				bowler_id: None,
			})
		);
		assert_eq!(
			commands[1],
			ScriptCommand::Extra {
				extra_type: ExtraType::LegBye,
				total_runs: 2,
				batsman_runs: 0,
			}
		);
		assert_eq!(
			commands[2],
			ScriptCommand::Wicket {
				dismissal: DismissalType::RunOut,
				fielder_id: Some("b2".to_string()),
				replacement_id: None,
			}
		);
		assert_eq!(commands[4], ScriptCommand::Undo);
		assert_eq!(commands[5], ScriptCommand::EndInnings);
	}
}
