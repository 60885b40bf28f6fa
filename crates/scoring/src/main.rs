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

//! Scoring runner entry point
//!
//! Wires up the components around one match:
//! - Configuration (`CREASE_*` environment, optional file)
//! - Logging (daily rolling file, optional console)
//! - Match Store (JSON files, when `store_path` is set)
//! - Sync Coordinator (HTTP, when `sync_endpoint` is set)
//! - Orchestrator, fed the commands of a JSON match script
//!
//! The final scorecard is printed to stdout as JSON.

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use crease_scoring::{
	FileMatchStore, HttpSyncClient, MatchOrchestrator, MatchSetup, MomRanking, Scorecard,
	config::ScoringConfig,
	script::{self, MatchScript, ReplayReport},
};

#[derive(Parser, Debug)]
#[command(
	name = "crease-scoring",
	about = "Replay a scripted cricket match and print its scorecard"
)]
struct Args {
	/// JSON match script
	script: PathBuf,

	/// Configuration file, overridden by CREASE_* environment variables
	#[arg(long)]
	config: Option<String>,

	/// Include the full Man of the Match ranking
	#[arg(long)]
	ranking: bool,
}

#[derive(Serialize)]
struct Output {
	scorecard: Scorecard,
	replay: ReplayReport,
	#[serde(skip_serializing_if = "Option::is_none")]
	ranking: Option<MomRanking>,
}

fn main() -> Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => ScoringConfig::from_file(path)
			.with_context(|| format!("Failed to load configuration from {}", path))?,
		None => ScoringConfig::from_env().context("Failed to load configuration from environment")?,
	};

	crease_scoring::logging::init_logging(config.log_level())?;
	info!(target: "runner", ?config, "Starting scoring runner");

	let raw = fs::read_to_string(&args.script)
		.with_context(|| format!("Failed to read script {}", args.script.display()))?;
	let script: MatchScript = serde_json::from_str(&raw)
		.with_context(|| format!("Failed to parse script {}", args.script.display()))?;

	let mut rules = config.rules();
	if let Some(overs) = script.overs_limit {
		rules.overs_limit = overs;
	}
	let mut setup = MatchSetup::new(script.teams, rules);
	if let Some(match_id) = script.match_id {
		setup.match_id = match_id;
	}

	let mut orchestrator = MatchOrchestrator::new(setup).context("Invalid match setup")?;

	if let Some(path) = &config.store_path {
		let store = FileMatchStore::open(path)
			.with_context(|| format!("Failed to open match store at {}", path.display()))?;
		info!(target: "runner", path = %path.display(), "Persisting to file store");
		orchestrator = orchestrator.with_store(Box::new(store));
	}

	if let Some(endpoint) = &config.sync_endpoint {
		match HttpSyncClient::new(endpoint, config.sync_timeout()) {
			Ok(client) => {
				info!(target: "runner", %endpoint, "Remote sync enabled");
				orchestrator = orchestrator.with_sync(Arc::new(client));
			}
			Err(e) => warn!(target: "runner", %endpoint, error = %e, "Remote sync disabled"),
		}
	}

	let replay = script::replay(&mut orchestrator, &script.commands);
	info!(
		target: "runner",
		match_id = %orchestrator.match_id(),
		applied = replay.applied,
		rejected = replay.rejected.len(),
		phase = %orchestrator.match_state().phase,
		"Script replayed"
	);

	let output = Output {
		scorecard: orchestrator.scorecard(),
		replay,
		ranking: args.ranking.then(|| orchestrator.mom_ranking()),
	};
	println!(
		"{}",
		serde_json::to_string_pretty(&output).context("Failed to render scorecard")?
	);

	orchestrator.shutdown();
	Ok(())
}
