//! Shared fixtures for the scoring integration tests

#![allow(dead_code)]

use crease_scoring::{
	DeliveryOutcome, InningsStart, MatchOrchestrator, MatchRules, MatchSetup, ScoringError,
};
use crease_sdk::types::{DismissalType, Player, Team};

/// Team `id` with players `{id}1..={id}{size}`
pub fn team(id: &str, size: usize) -> Team {
	Team::new(
		id,
		format!("Team {}", id.to_uppercase()),
		(1..=size)
			.map(|i| {
				let name = format!("Player {}{}", id.to_uppercase(), i);
				Player::new(format!("{}{}", id, i), name)
			})
			.collect(),
	)
}

pub fn setup(size: usize, rules: MatchRules) -> MatchSetup {
	MatchSetup::new([team("a", size), team("b", size)], rules)
}

pub fn opening(batting: &str, bowling: &str, bowler: Option<&str>) -> InningsStart {
	InningsStart {
		batting_team_id: batting.to_string(),
		bowling_team_id: bowling.to_string(),
		striker_id: format!("{}1", batting),
		non_striker_id: format!("{}2", batting),
		bowler_id: bowler.map(str::to_string),
	}
}

/// Match with team `a` batting against `b1`
pub fn started_match(size: usize, rules: MatchRules) -> MatchOrchestrator {
	let mut orchestrator = MatchOrchestrator::new(setup(size, rules)).unwrap();
	orchestrator.start_innings(&opening("a", "b", Some("b1"))).unwrap();
	orchestrator
}

pub fn striker(orchestrator: &MatchOrchestrator) -> Option<String> {
	orchestrator.match_state().current_innings().striker_id.clone()
}

pub fn non_striker(orchestrator: &MatchOrchestrator) -> Option<String> {
	orchestrator.match_state().current_innings().non_striker_id.clone()
}

/// Dismiss the striker, bringing in the next available batsman if any
pub fn take_wicket(
	orchestrator: &mut MatchOrchestrator,
	dismissal: DismissalType,
) -> Result<DeliveryOutcome, ScoringError> {
	let replacement = orchestrator
		.match_state()
		.available_batsmen()
		.first()
		.map(|id| id.to_string());
	orchestrator.apply_wicket(dismissal, None, replacement.as_deref())
}

/// Score each ball off the bat; `None` is a bowled wicket
pub fn bowl(orchestrator: &mut MatchOrchestrator, balls: &[Option<u32>]) {
	for ball in balls {
		match ball {
			Some(runs) => orchestrator.apply_run(*runs).unwrap(),
			None => take_wicket(orchestrator, DismissalType::Bowled).unwrap(),
		};
	}
}

/// Hand the next over to whichever of the two named bowlers is not resting
pub fn change_bowler(orchestrator: &mut MatchOrchestrator, first: &str, second: &str) {
	let previous = orchestrator.match_state().previous_over_bowler_id.clone();
	let next = if previous.as_deref() == Some(first) {
		second
	} else {
		first
	};
	orchestrator.select_bowler(next).unwrap();
}
