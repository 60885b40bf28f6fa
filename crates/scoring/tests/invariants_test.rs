//! Scoring invariants
//!
//! These tests verify:
//! - Over bound and extras ball-counting
//! - Run conservation against the ball log
//! - Strike parity, including the over boundary
//! - Bowler rotation rules
//! - All-or-nothing rejection of invalid commands

mod common;

use crease_scoring::{
	MatchOrchestrator, MatchRules, Phase, ScoringError, ValidationError, ledger,
};
use crease_sdk::types::{Delivery, DismissalType, ExtraType};

use common::{bowl, change_bowler, non_striker, setup, started_match, striker};

fn extra(extra_type: ExtraType, total_runs: u32, batsman_runs: u32) -> Delivery {
	Delivery::Extra {
		extra_type,
		total_runs,
		batsman_runs,
	}
}

fn run(runs: u32) -> Delivery {
	Delivery::Run { runs }
}

/// Three overs' worth of mixed deliveries, no wickets
fn mixed_deliveries() -> Vec<Delivery> {
	vec![
		run(1),
		extra(ExtraType::Wide, 1, 0),
		run(0),
		extra(ExtraType::NoBall, 5, 4),
		extra(ExtraType::LegBye, 1, 0),
		run(4),
		extra(ExtraType::Wide, 5, 0),
		run(6),
		extra(ExtraType::Bye, 2, 0),
		run(2),
		run(3),
		extra(ExtraType::NoBall, 1, 0),
		run(0),
		run(1),
		extra(ExtraType::NoBall, 3, 1),
		run(0),
		run(0),
		run(2),
		extra(ExtraType::LegBye, 4, 0),
		run(1),
		run(0),
		run(1),
	]
}

/// Apply deliveries, changing bowler between overs
fn play(
	m: &mut MatchOrchestrator,
	deliveries: &[Delivery],
	mut check: impl FnMut(&MatchOrchestrator, &Delivery),
) {
	for delivery in deliveries {
		if m.match_state().phase == Phase::AwaitingBowlerSelection {
			change_bowler(m, "b1", "b2");
		}
		m.apply(delivery).unwrap();
		check(m, delivery);
	}
}

#[test]
fn test_over_bound() {
	let mut m = started_match(11, MatchRules::default());
	let mut legal = 0;

	play(&mut m, &mixed_deliveries(), |m, delivery| {
		if !matches!(
			delivery,
			Delivery::Extra {
				extra_type: ExtraType::Wide | ExtraType::NoBall,
				..
			}
		) {
			legal += 1;
		}
		let innings = m.match_state().current_innings();
		assert!(innings.balls_in_current_over < 6);
		assert_eq!(innings.overs_completed * 6 + innings.balls_in_current_over, legal);
	});

	assert_eq!(legal, 17);
	assert_eq!(m.match_state().current_innings().overs(), "2.5");
}

#[test]
fn test_wides_and_no_balls_do_not_count() {
	let mut m = started_match(11, MatchRules::default());
	bowl(&mut m, &[Some(0), Some(0)]);
	let facing = striker(&m).unwrap();
	let faced_before = m.stats().of(&facing).batting.balls_faced;

	m.apply_extra(ExtraType::Wide, 3, 0).unwrap();
	assert_eq!(m.match_state().current_innings().balls_in_current_over, 2);
	assert_eq!(m.stats().of(&facing).batting.balls_faced, faced_before);

	m.apply_extra(ExtraType::NoBall, 5, 4).unwrap();
	let innings = m.match_state().current_innings();
	assert_eq!(innings.balls_in_current_over, 2);
	assert_eq!(innings.overs_completed, 0);
	assert_eq!(innings.extras.wide, 3);
	assert_eq!(innings.extras.no_ball, 1);

	let batting = m.stats().of(&facing).batting;
	assert_eq!(batting.balls_faced, faced_before + 1);
	assert_eq!(batting.runs, 4);
	assert_eq!(batting.fours, 1);

	let bowling = m.stats().of("b1").bowling;
	assert_eq!(bowling.balls_bowled, 2);
	assert_eq!(bowling.runs_conceded, 8);
}

#[test]
fn test_run_conservation() {
	let mut m = started_match(11, MatchRules::default());
	play(&mut m, &mixed_deliveries(), |m, _| {
		assert!(ledger::verify(m.match_state()).is_ok());
	});

	let state = m.match_state();
	let logged: u32 = state
		.deliveries_in(1)
		.map(|r| r.runs_scored + r.penalty_runs)
		.sum();
	assert_eq!(state.current_innings().runs, logged);
	assert_eq!(logged, 43);

	let innings = state.current_innings();
	let bat: u32 = innings
		.batting_order
		.iter()
		.map(|id| m.stats().of(id).batting.runs)
		.sum();
	assert_eq!(bat + innings.extras.total(), innings.runs);
}

#[test]
fn test_strike_parity() {
	let mut m = started_match(11, MatchRules::default());
	let a = striker(&m);
	let b = non_striker(&m);

	m.apply_run(1).unwrap();
	assert_eq!(striker(&m), b);
	m.apply_run(2).unwrap();
	assert_eq!(striker(&m), b);
	m.apply_extra(ExtraType::Bye, 3, 0).unwrap();
	assert_eq!(striker(&m), a);
	m.apply_extra(ExtraType::LegBye, 2, 0).unwrap();
	assert_eq!(striker(&m), a);
	m.apply_extra(ExtraType::NoBall, 2, 1).unwrap();
	assert_eq!(striker(&m), b);
	m.apply_extra(ExtraType::NoBall, 3, 2).unwrap();
	assert_eq!(striker(&m), b);
	m.apply_extra(ExtraType::Wide, 2, 0).unwrap();
	assert_eq!(striker(&m), b);

	// Balls 5 and 6: a single on the last ball keeps the same batsman on strike
	m.apply_run(0).unwrap();
	let last_ball_striker = striker(&m);
	m.apply_run(1).unwrap();
	assert_eq!(m.match_state().current_innings().overs_completed, 1);
	assert_eq!(striker(&m), last_ball_striker);

	// A quiet over hands strike to the other end
	m.select_bowler("b2").unwrap();
	let before = striker(&m);
	bowl(&mut m, &[Some(0); 6]);
	assert_ne!(striker(&m), before);
	assert_eq!(m.stats().of("b2").bowling.maidens, 1);
}

#[test]
fn test_rotation_rules() {
	let rules = MatchRules {
		max_overs_per_bowler: Some(1),
		..MatchRules::with_overs(5)
	};
	let mut m = started_match(11, rules);
	bowl(&mut m, &[Some(1); 6]);

	assert_eq!(
		m.select_bowler("b1").unwrap_err(),
		ScoringError::Validation(ValidationError::ConsecutiveOvers("b1".to_string()))
	);
	assert_eq!(
		m.select_bowler("a3").unwrap_err(),
		ScoringError::Validation(ValidationError::NotInBowlingSide("a3".to_string()))
	);
	assert_eq!(m.match_state().current_bowler_id.as_deref(), Some("b1"));

	m.select_bowler("b2").unwrap();
	bowl(&mut m, &[Some(0); 6]);

	assert_eq!(
		m.select_bowler("b1").unwrap_err(),
		ScoringError::Validation(ValidationError::BowlerQuotaExhausted {
			bowler: "b1".to_string(),
			overs: 1,
		})
	);
	m.select_bowler("b3").unwrap();
	assert!(matches!(m.select_bowler("b4"), Err(ScoringError::State(_))));
}

#[test]
fn test_rejections_leave_state_untouched() {
	let mut m = started_match(11, MatchRules::default());
	bowl(&mut m, &[Some(1), Some(4)]);
	let state = m.match_state().clone();
	let stats = m.stats().clone();

	let invalid = [
		run(7),
		extra(ExtraType::Wide, 0, 0),
		extra(ExtraType::Wide, 3, 2),
		extra(ExtraType::NoBall, 2, 2),
		extra(ExtraType::Bye, 0, 0),
		extra(ExtraType::LegBye, 2, 1),
		extra(ExtraType::Bye, 7, 0),
		Delivery::Wicket {
			dismissal: DismissalType::Bowled,
			fielder_id: None,
			replacement_id: None,
		},
		Delivery::Wicket {
			dismissal: DismissalType::Caught,
			fielder_id: Some("b2".to_string()),
			replacement_id: Some("b3".to_string()),
		},
		Delivery::Wicket {
			dismissal: DismissalType::Bowled,
			fielder_id: Some("b2".to_string()),
			replacement_id: Some("a3".to_string()),
		},
		Delivery::Wicket {
			dismissal: DismissalType::Caught,
			fielder_id: Some("b2".to_string()),
			replacement_id: striker(&m),
		},
	];

	for delivery in &invalid {
		let err = m.apply(delivery).unwrap_err();
		assert!(matches!(err, ScoringError::Validation(_)), "{:?} gave {:?}", delivery, err);
		assert_eq!(m.match_state(), &state);
		assert_eq!(m.stats(), &stats);
	}
}

#[test]
fn test_commands_before_the_toss() {
	let mut m = MatchOrchestrator::new(setup(11, MatchRules::default())).unwrap();
	assert_eq!(m.match_state().phase, Phase::NotStarted);

	assert!(matches!(m.apply_run(1), Err(ScoringError::State(_))));
	assert!(matches!(m.select_bowler("b1"), Err(ScoringError::State(_))));
	assert!(matches!(m.end_innings_manually(), Err(ScoringError::State(_))));
	assert_eq!(m.undo_last_delivery().unwrap_err(), ScoringError::UndoNoOp);
}
