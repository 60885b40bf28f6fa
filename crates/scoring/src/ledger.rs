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

//! Innings totals re-derived from the ball log
//!
//! The log is the ground truth. These totals are only compared against the
//! running score; a mismatch is reported, never patched.

use crease_sdk::types::ExtraType;
use thiserror::Error;

use crate::{
	engine::{InningsScore, MatchState},
	types::{DeliveryRecord, ExtrasTally},
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Innings {innings} {field}: ball log gives {derived}, score says {recorded}")]
pub struct LedgerMismatch {
	pub innings: u8,
	pub field: &'static str,
	pub derived: u32,
	pub recorded: u32,
}

/// Totals of one innings as implied by its deliveries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
	pub runs: u32,
	pub wickets: u32,
	pub legal_balls: u32,
	pub extras: ExtrasTally,
}

impl LedgerTotals {
	pub fn from_log<'a>(records: impl IntoIterator<Item = &'a DeliveryRecord>) -> Self {
		records.into_iter().fold(Self::default(), |mut totals, record| {
			totals.runs += record.total_runs();
			if record.is_wicket {
				totals.wickets += 1;
			}
			if record.is_legal() {
				totals.legal_balls += 1;
			}
			if let Some(extra_type) = record.extra_type {
				let runs = match extra_type {
					ExtraType::NoBall => record.total_runs() - record.batsman_runs,
					_ => record.total_runs(),
				};
				totals.extras.add(extra_type, runs);
			}
			totals
		})
	}

	fn compare(&self, innings: u8, score: &InningsScore) -> Result<(), LedgerMismatch> {
		let checks = [
			("runs", self.runs, score.runs),
			("wickets", self.wickets, score.wickets),
			("legal balls", self.legal_balls, score.legal_balls()),
			("wides", self.extras.wide, score.extras.wide),
			("no-balls", self.extras.no_ball, score.extras.no_ball),
			("byes", self.extras.bye, score.extras.bye),
			("leg-byes", self.extras.leg_bye, score.extras.leg_bye),
		];

		match checks.into_iter().find(|(_, derived, recorded)| derived != recorded) {
			Some((field, derived, recorded)) => Err(LedgerMismatch {
				innings,
				field,
				derived,
				recorded,
			}),
			None => Ok(()),
		}
	}
}

/// Check both innings against the ball log
pub fn verify(state: &MatchState) -> Result<(), LedgerMismatch> {
	for (index, score) in state.innings.iter().enumerate() {
		let innings = index as u8 + 1;
		LedgerTotals::from_log(state.deliveries_in(innings)).compare(innings, score)?;
	}
	Ok(())
}
