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

//! Crease Scoring Engine
//!
//! This crate records a two-innings limited-overs cricket match ball by
//! ball. It keeps the score, per-player figures and the ball log, enforces
//! strike and bowler rotation, moves the match through its innings, settles
//! the result and the Man of the Match, and can take back deliveries one at
//! a time.
//!
//! Architecture:
//! - Single-threaded, command-driven core; every command validates fully
//!   before mutating, so a rejected command leaves no trace
//! - Explicit phase machine (`NotStarted`, `Active`, `AwaitingBowlerSelection`,
//!   `InningsBreak`, `Completed`) guarding every entry point
//! - Per-delivery state snapshots for LIFO undo
//! - Match Store persisted after every successful command
//! - Background single-flight sync of completed matches

pub mod config;
pub mod engine;
pub mod ledger;
pub mod lifecycle;
pub mod logging;
pub mod mom;
pub mod orchestrator;
pub mod rotation;
pub mod scorecard;
pub mod script;
pub mod stats;
pub mod store;
pub mod sync;
pub mod types;
pub mod undo;

pub use engine::{InningsScore, MatchState};
pub use lifecycle::{InningsEnd, InningsStart};
pub use mom::{MomAward, MomRanking};
pub use orchestrator::{MatchOrchestrator, MatchSetup};
pub use scorecard::Scorecard;
pub use stats::{BattingStats, BowlingStats, PlayerMatchStats, StatsAggregator};
pub use store::{FileMatchStore, MatchStore, MemoryMatchStore, PersistedMatch, StoreError};
pub use sync::{HttpSyncClient, RemoteSyncClient, SyncCoordinator, SyncError, SyncTrigger};
pub use types::*;
pub use undo::StateSnapshot;
