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

mod state;

pub use state::{InningsScore, MatchState};

use crease_sdk::types::{Delivery, DismissalType, ExtraType, PlayerId};
use tracing::debug;

use crate::{
	ledger, lifecycle, rotation,
	stats::{StatsAggregator, overs_notation},
	types::{
		BALLS_PER_OVER, DeliveryOutcome, DeliveryRecord, MAX_RUNS_PER_BALL, Phase, ScoringError,
		ValidationError, WicketRecord,
	},
	undo::StateSnapshot,
};

/// Dismissal part of a validated delivery
#[derive(Debug)]
struct WicketPlan {
	dismissal: DismissalType,
	fielder_id: Option<PlayerId>,
	replacement_id: Option<PlayerId>,
}

/// A delivery that passed validation, broken down into its effects
///
/// Everything that can fail is decided while building the plan; applying a
/// plan never fails, so a rejected delivery leaves no trace.
#[derive(Debug)]
struct DeliveryPlan {
	extra_type: Option<ExtraType>,
	/// Runs off the delivery excluding penalty
	runs_scored: u32,
	batsman_runs: u32,
	penalty_runs: u32,
	/// Counts toward the over
	legal: bool,
	striker_faces: bool,
	bowler_runs: u32,
	rotate_on_runs: bool,
	wicket: Option<WicketPlan>,
}

impl DeliveryPlan {
	fn off_the_bat(runs: u32) -> Self {
		Self {
			extra_type: None,
			runs_scored: runs,
			batsman_runs: runs,
			penalty_runs: 0,
			legal: true,
			striker_faces: true,
			bowler_runs: runs,
			rotate_on_runs: runs % 2 == 1,
			wicket: None,
		}
	}

	fn total_runs(&self) -> u32 {
		self.runs_scored + self.penalty_runs
	}

	/// Runs that go into the extras column
	fn extras_runs(&self) -> u32 {
		self.total_runs() - self.batsman_runs
	}
}

fn invalid_runs(msg: impl Into<String>) -> ValidationError {
	ValidationError::InvalidRuns(msg.into())
}

fn plan_extra(
	state: &MatchState,
	extra_type: ExtraType,
	total_runs: u32,
	batsman_runs: u32,
) -> Result<DeliveryPlan, ValidationError> {
	let penalty = state.rules.penalty_for(extra_type);
	if total_runs < penalty {
		return Err(invalid_runs(format!(
			"a {} carries a {} run penalty, got {} total",
			extra_type, penalty, total_runs
		)));
	}

	let off_ball = total_runs - penalty;
	if off_ball > MAX_RUNS_PER_BALL {
		return Err(invalid_runs(format!(
			"{} runs off one {} exceeds {}",
			off_ball, extra_type, MAX_RUNS_PER_BALL
		)));
	}

	if extra_type != ExtraType::NoBall && batsman_runs != 0 {
		return Err(invalid_runs(format!(
			"no runs are credited to the batsman off a {}",
			extra_type
		)));
	}

	let plan = match extra_type {
		ExtraType::Wide => DeliveryPlan {
			extra_type: Some(extra_type),
			runs_scored: off_ball,
			batsman_runs: 0,
			penalty_runs: penalty,
			legal: false,
			striker_faces: false,
			bowler_runs: total_runs,
			rotate_on_runs: false,
			wicket: None,
		},
		ExtraType::NoBall => {
			if batsman_runs > off_ball {
				return Err(invalid_runs(format!(
					"batsman runs {} exceed the {} runs taken off the no-ball",
					batsman_runs, off_ball
				)));
			}
			DeliveryPlan {
				extra_type: Some(extra_type),
				runs_scored: off_ball,
				batsman_runs,
				penalty_runs: penalty,
				legal: false,
				striker_faces: true,
				bowler_runs: total_runs,
				rotate_on_runs: batsman_runs % 2 == 1,
				wicket: None,
			}
		}
		ExtraType::Bye | ExtraType::LegBye => {
			if total_runs == 0 {
				return Err(invalid_runs(format!("a {} needs at least one run", extra_type)));
			}
			DeliveryPlan {
				extra_type: Some(extra_type),
				runs_scored: total_runs,
				batsman_runs: 0,
				penalty_runs: 0,
				legal: true,
				striker_faces: true,
				bowler_runs: 0,
				rotate_on_runs: total_runs % 2 == 1,
				wicket: None,
			}
		}
	};

	Ok(plan)
}

fn plan_wicket(
	state: &MatchState,
	dismissal: DismissalType,
	fielder_id: Option<&PlayerId>,
	replacement_id: Option<&PlayerId>,
) -> Result<DeliveryPlan, ValidationError> {
	if let Some(fielder) = fielder_id {
		if !dismissal.involves_fielder() {
			return Err(ValidationError::UnexpectedFielder(dismissal));
		}
		if !state.bowling_team().contains(fielder) {
			return Err(ValidationError::NotInBowlingSide(fielder.clone()));
		}
	}

	let innings = state.current_innings();
	let available = state.available_batsmen();
	let completes_final_over = innings.balls_in_current_over + 1 == BALLS_PER_OVER
		&& innings.overs_completed + 1 >= state.total_overs_limit;

	match replacement_id {
		Some(replacement) if !available.contains(&replacement.as_str()) => {
			return Err(ValidationError::IneligibleReplacement(replacement.clone()));
		}
		None if !available.is_empty() && !completes_final_over => {
			return Err(ValidationError::ReplacementRequired);
		}
		_ => {}
	}

	Ok(DeliveryPlan {
		wicket: Some(WicketPlan {
			dismissal,
			fielder_id: fielder_id.cloned(),
			replacement_id: replacement_id.cloned(),
		}),
		..DeliveryPlan::off_the_bat(0)
	})
}

fn plan_delivery(state: &MatchState, delivery: &Delivery) -> Result<DeliveryPlan, ValidationError> {
	match delivery {
		Delivery::Run { runs } => {
			if *runs > MAX_RUNS_PER_BALL {
				return Err(invalid_runs(format!(
					"{} runs off one ball exceeds {}",
					runs, MAX_RUNS_PER_BALL
				)));
			}
			Ok(DeliveryPlan::off_the_bat(*runs))
		}
		Delivery::Extra {
			extra_type,
			total_runs,
			batsman_runs,
		} => plan_extra(state, *extra_type, *total_runs, *batsman_runs),
		Delivery::Wicket {
			dismissal,
			fielder_id,
			replacement_id,
		} => plan_wicket(state, *dismissal, fielder_id.as_ref(), replacement_id.as_ref()),
	}
}

fn participants(state: &MatchState) -> Result<(PlayerId, PlayerId, PlayerId), ValidationError> {
	let innings = state.current_innings();
	match (
		&innings.striker_id,
		&innings.non_striker_id,
		&state.current_bowler_id,
	) {
		(Some(striker), Some(non_striker), Some(bowler)) => {
			Ok((striker.clone(), non_striker.clone(), bowler.clone()))
		}
		_ => Err(ValidationError::MissingParticipants),
	}
}

/// Dismiss the striker and bring in the next batsman, if any
fn take_wicket(
	state: &mut MatchState,
	stats: &mut StatsAggregator,
	striker: &str,
	bowler: &str,
	wicket: WicketPlan,
) {
	if wicket.dismissal.credited_to_bowler() {
		stats.credit_wicket(bowler);
	}

	let nobody_left = state.available_batsmen().is_empty();
	let allow_last_man = state.rules.last_man_standing;
	let innings = state.current_innings_mut();

	innings.wickets += 1;
	innings.dismissed.push(striker.to_string());
	innings.fall_of_wickets.push(WicketRecord {
		wicket_number: innings.wickets,
		batsman_id: striker.to_string(),
		dismissal: wicket.dismissal,
		bowler_id: wicket
			.dismissal
			.credited_to_bowler()
			.then(|| bowler.to_string()),
		fielder_id: wicket.fielder_id,
		team_score_at_fall: innings.runs,
		over_at_fall: overs_notation(innings.legal_balls()),
	});

	if let Some(replacement) = wicket.replacement_id {
		innings.batting_order.push(replacement.clone());
		innings.striker_id = Some(replacement);
	} else if innings.last_man_standing || (nobody_left && !allow_last_man) {
		innings.striker_id = None;
		if innings.last_man_standing {
			innings.non_striker_id = None;
		}
		innings.all_out = true;
	} else if nobody_left {
		innings.striker_id = innings.non_striker_id.clone();
		innings.last_man_standing = true;
	} else {
		// Innings closes on this ball, nobody comes in
		innings.striker_id = None;
	}
}

/// Apply one delivery to the innings in play
///
/// Validates completely before touching anything, captures the undo
/// snapshot, applies runs, extras, the dismissal and ball counting, then
/// hands over to the lifecycle (innings end) or rotation (over end).
pub fn apply_delivery(
	state: &mut MatchState,
	stats: &mut StatsAggregator,
	delivery: &Delivery,
) -> Result<DeliveryOutcome, ScoringError> {
	if state.phase != Phase::Active {
		return Err(ScoringError::state("record a delivery", state.phase));
	}

	let (striker, non_striker, bowler) = participants(state)?;
	let mut plan = plan_delivery(state, delivery)?;

	let snapshot = StateSnapshot::capture(state, stats);
	let innings_number = state.current_innings_number;
	let (over, ball_in_over) = {
		let innings = state.current_innings();
		(innings.overs_completed, innings.balls_in_current_over + 1)
	};

	{
		let innings = state.current_innings_mut();
		innings.runs += plan.total_runs();
		if let Some(extra_type) = plan.extra_type {
			innings.extras.add(extra_type, plan.extras_runs());
		}
		innings.runs_conceded_this_over += plan.bowler_runs;
		if plan.rotate_on_runs {
			innings.rotate_strike();
		}
		if plan.legal {
			innings.balls_in_current_over += 1;
		}
	}

	if plan.striker_faces {
		stats.record_ball_faced(&striker, plan.batsman_runs);
	}
	stats.record_bowled(&bowler, plan.bowler_runs, plan.legal);

	let dismissal = plan.wicket.as_ref().map(|w| w.dismissal);
	let fielder_id = plan.wicket.as_ref().and_then(|w| w.fielder_id.clone());
	if let Some(wicket) = plan.wicket.take() {
		take_wicket(state, stats, &striker, &bowler, wicket);
	}

	let mut over_completed = false;
	{
		let innings = state.current_innings_mut();
		if innings.balls_in_current_over == BALLS_PER_OVER {
			innings.balls_in_current_over = 0;
			innings.overs_completed += 1;
			innings.rotate_strike();
			let maiden = innings.runs_conceded_this_over == 0;
			innings.runs_conceded_this_over = 0;
			if maiden {
				stats.credit_maiden(&bowler);
			}
			over_completed = true;
		}
	}

	let sequence = state.ball_log.last().map_or(1, |r| r.sequence + 1);
	state.ball_log.push(DeliveryRecord {
		sequence,
		innings: innings_number,
		over,
		ball_in_over,
		batsman_id: striker,
		non_striker_id: non_striker,
		bowler_id: bowler,
		runs_scored: plan.runs_scored,
		batsman_runs: plan.batsman_runs,
		penalty_runs: plan.penalty_runs,
		extra_type: plan.extra_type,
		is_wicket: dismissal.is_some(),
		dismissal,
		fielder_id,
		snapshot,
	});

	debug!(
		target: "engine",
		sequence,
		innings = innings_number,
		over,
		ball = ball_in_over,
		delivery = ?delivery,
		score = state.current_innings().runs,
		wickets = state.current_innings().wickets,
		"Delivery applied"
	);

	let innings_ended = match lifecycle::innings_end_reason(state) {
		Some(reason) => {
			lifecycle::end_innings(state, stats, reason);
			true
		}
		None => {
			if over_completed {
				rotation::on_over_completed(state);
			}
			false
		}
	};

	debug_assert!(
		ledger::verify(state).is_ok(),
		"innings totals diverged from the ball log"
	);

	Ok(DeliveryOutcome {
		sequence,
		over_completed,
		innings_ended,
		match_completed: state.phase == Phase::Completed,
		awaiting_bowler: state.phase == Phase::AwaitingBowlerSelection,
		last_man_standing: !innings_ended && state.current_innings().last_man_standing,
	})
}
