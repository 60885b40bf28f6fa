//! Undo integration tests
//!
//! These tests verify:
//! - Apply then undo restores state and statistics exactly
//! - LIFO undo across over boundaries and innings ends
//! - Undo limits at innings start and after completion

mod common;

use crease_scoring::{MatchRules, Phase, ScoringError};
use crease_sdk::types::{Delivery, DismissalType, ExtraType};

use common::{bowl, opening, started_match};

#[test]
fn test_undo_round_trip_for_every_kind_of_delivery() {
	let mut m = started_match(11, MatchRules::with_overs(3));
	bowl(&mut m, &[Some(1), Some(2), Some(0), Some(4)]);

	let deliveries = [
		Delivery::Extra {
			extra_type: ExtraType::Wide,
			total_runs: 3,
			batsman_runs: 0,
		},
		Delivery::Extra {
			extra_type: ExtraType::NoBall,
			total_runs: 7,
			batsman_runs: 6,
		},
		Delivery::Wicket {
			dismissal: DismissalType::Caught,
			fielder_id: Some("b4".to_string()),
			replacement_id: Some("a3".to_string()),
		},
		// Completes the over
		Delivery::Extra {
			extra_type: ExtraType::LegBye,
			total_runs: 1,
			batsman_runs: 0,
		},
	];

	for delivery in &deliveries {
		let state = m.match_state().clone();
		let stats = m.stats().clone();

		m.apply(delivery).unwrap();
		assert_ne!(m.match_state(), &state);

		let undone = m.undo_last_delivery().unwrap();
		assert_eq!(m.match_state(), &state, "state differs after undoing {:?}", delivery);
		assert_eq!(m.stats(), &stats, "stats differ after undoing {:?}", delivery);
		assert_eq!(undone.snapshot.stats, *stats.as_map());

		m.apply(delivery).unwrap();
	}

	assert_eq!(m.match_state().phase, Phase::AwaitingBowlerSelection);
	assert_eq!(m.match_state().current_innings().overs_completed, 1);
}

#[test]
fn test_undo_is_lifo_and_stops_at_innings_start() {
	let mut m = started_match(11, MatchRules::with_overs(3));
	let start = m.match_state().clone();

	bowl(&mut m, &[Some(1), Some(4), Some(6)]);
	assert_eq!(m.undo_last_delivery().unwrap().runs_scored, 6);
	assert_eq!(m.undo_last_delivery().unwrap().runs_scored, 4);
	assert_eq!(m.undo_last_delivery().unwrap().runs_scored, 1);

	assert_eq!(m.match_state(), &start);
	assert_eq!(m.undo_last_delivery().unwrap_err(), ScoringError::UndoNoOp);
	assert_eq!(m.match_state(), &start);
}

#[test]
fn test_undo_over_completion_lowers_the_barrier() {
	let mut m = started_match(11, MatchRules::with_overs(3));
	bowl(&mut m, &[Some(0); 6]);
	assert_eq!(m.match_state().phase, Phase::AwaitingBowlerSelection);
	assert_eq!(m.stats().of("b1").bowling.maidens, 1);

	m.undo_last_delivery().unwrap();

	let state = m.match_state();
	assert_eq!(state.phase, Phase::Active);
	assert_eq!(state.current_bowler_id.as_deref(), Some("b1"));
	assert!(state.previous_over_bowler_id.is_none());
	assert_eq!(state.current_innings().balls_in_current_over, 5);
	assert_eq!(m.stats().of("b1").bowling.maidens, 0);
}

#[test]
fn test_undo_across_the_innings_break() {
	let mut m = started_match(11, MatchRules::with_overs(1));
	bowl(&mut m, &[Some(1); 6]);
	assert_eq!(m.match_state().phase, Phase::InningsBreak);
	assert_eq!(m.match_state().target, Some(7));

	// The ball that ended the innings can still be taken back
	m.undo_last_delivery().unwrap();
	let state = m.match_state();
	assert_eq!(state.phase, Phase::Active);
	assert_eq!(state.current_innings_number, 1);
	assert!(state.target.is_none());
	assert_eq!(state.current_innings().runs, 5);

	m.apply_run(1).unwrap();
	m.start_innings(&opening("b", "a", Some("a1"))).unwrap();

	// First innings is frozen once the second has started
	assert_eq!(m.undo_last_delivery().unwrap_err(), ScoringError::UndoNoOp);
	assert_eq!(m.match_state().innings[0].runs, 6);

	m.apply_run(2).unwrap();
	m.undo_last_delivery().unwrap();
	assert_eq!(m.match_state().current_innings().runs, 0);
	assert_eq!(m.match_state().phase, Phase::Active);
}

#[test]
fn test_undo_reverts_manual_innings_end() {
	let mut m = started_match(11, MatchRules::with_overs(5));
	bowl(&mut m, &[Some(4), Some(1)]);
	m.end_innings_manually().unwrap();
	assert_eq!(m.match_state().phase, Phase::InningsBreak);

	let undone = m.undo_last_delivery().unwrap();
	assert_eq!(undone.runs_scored, 1);

	let state = m.match_state();
	assert_eq!(state.phase, Phase::Active);
	assert_eq!(state.current_innings_number, 1);
	assert_eq!(state.current_innings().runs, 4);
	assert!(state.target.is_none());
}

#[test]
fn test_undo_wicket_restores_batsmen() {
	let mut m = started_match(5, MatchRules::with_overs(5));
	m.apply_wicket(DismissalType::Stumped, Some("b5"), Some("a3"))
		.unwrap();
	m.undo_last_delivery().unwrap();

	let innings = m.match_state().current_innings();
	assert_eq!(innings.wickets, 0);
	assert!(innings.fall_of_wickets.is_empty());
	assert!(innings.dismissed.is_empty());
	assert_eq!(innings.striker_id.as_deref(), Some("a1"));
	assert_eq!(innings.batting_order, vec!["a1".to_string(), "a2".to_string()]);
	assert_eq!(m.stats().of("b1").bowling.wickets, 0);
	assert_eq!(m.match_state().available_batsmen(), vec!["a3", "a4", "a5"]);
}
