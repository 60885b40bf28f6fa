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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use crease_scoring::{
	InningsStart, MatchOrchestrator, MatchRules, MatchSetup, MemoryMatchStore, Phase,
};
use crease_sdk::types::{Delivery, DismissalType, ExtraType, Player, Team};

const OVERS: &[u32] = &[5, 20, 50];

fn team(id: &str) -> Team {
	Team::new(
		id,
		format!("Team {}", id),
		(1..=11)
			.map(|i| Player::new(format!("{}{}", id, i), format!("{} {}", id, i)))
			.collect(),
	)
}

fn opening(batting: &str, bowling: &str) -> InningsStart {
	InningsStart {
		batting_team_id: batting.to_string(),
		bowling_team_id: bowling.to_string(),
		striker_id: format!("{}1", batting),
		non_striker_id: format!("{}2", batting),
		bowler_id: Some(format!("{}1", bowling)),
	}
}

/// Deterministic ball `n` of an innings: mostly runs, some extras, a wicket every 40 balls
fn delivery(n: u32, replacement: Option<String>) -> Delivery {
	match n % 40 {
		39 => Delivery::Wicket {
			dismissal: DismissalType::Bowled,
			fielder_id: None,
			replacement_id: replacement,
		},
		7 => Delivery::Extra {
			extra_type: ExtraType::Wide,
			total_runs: 1,
			batsman_runs: 0,
		},
		19 => Delivery::Extra {
			extra_type: ExtraType::NoBall,
			total_runs: 2,
			batsman_runs: 1,
		},
		23 => Delivery::Extra {
			extra_type: ExtraType::LegBye,
			total_runs: 1,
			batsman_runs: 0,
		},
		_ => Delivery::Run { runs: n % 5 },
	}
}

/// Bowl one innings to its end, alternating two bowlers
fn play_innings(orchestrator: &mut MatchOrchestrator, bowlers: [&str; 2]) -> u32 {
	let mut applied = 0;
	let mut next_bowler = 1;

	loop {
		let state = orchestrator.match_state();
		match state.phase {
			Phase::Active => {
				let replacement = state.available_batsmen().first().map(|id| id.to_string());
				let _ = orchestrator.apply(&delivery(applied, replacement));
				applied += 1;
			}
			Phase::AwaitingBowlerSelection => {
				let _ = orchestrator.select_bowler(bowlers[next_bowler]);
				next_bowler = 1 - next_bowler;
			}
			_ => return applied,
		}
	}
}

fn play_match(overs: u32, with_store: bool) -> u32 {
	let setup = MatchSetup::new([team("a"), team("b")], MatchRules::with_overs(overs));
	let Ok(mut orchestrator) = MatchOrchestrator::new(setup) else {
		return 0;
	};
	if with_store {
		orchestrator = orchestrator.with_store(Box::new(MemoryMatchStore::new()));
	}

	let mut applied = 0;
	if orchestrator.start_innings(&opening("a", "b")).is_ok() {
		applied += play_innings(&mut orchestrator, ["b1", "b2"]);
	}
	if orchestrator.start_innings(&opening("b", "a")).is_ok() {
		applied += play_innings(&mut orchestrator, ["a1", "a2"]);
	}
	applied
}

fn bench_full_match(c: &mut Criterion) {
	let mut group = c.benchmark_group("full_match");
	group.sample_size(20);
	group.measurement_time(Duration::from_secs(10));

	for &overs in OVERS {
		group.throughput(Throughput::Elements(u64::from(play_match(overs, false))));
		group.bench_with_input(BenchmarkId::new("engine", overs), &overs, |b, &overs| {
			b.iter(|| black_box(play_match(overs, false)));
		});
		group.bench_with_input(BenchmarkId::new("with_store", overs), &overs, |b, &overs| {
			b.iter(|| black_box(play_match(overs, true)));
		});
	}

	group.finish();
}

fn bench_undo(c: &mut Criterion) {
	c.bench_function("apply_then_undo", |b| {
		let setup = MatchSetup::new([team("a"), team("b")], MatchRules::with_overs(50));
		let Ok(mut orchestrator) = MatchOrchestrator::new(setup) else {
			return;
		};
		if orchestrator.start_innings(&opening("a", "b")).is_err() {
			return;
		}
		let run = Delivery::Run { runs: 1 };

		b.iter(|| {
			let _ = black_box(orchestrator.apply(&run));
			let _ = black_box(orchestrator.undo_last_delivery());
		});
	});
}

criterion_group!(benches, bench_full_match, bench_undo);
criterion_main!(benches);
