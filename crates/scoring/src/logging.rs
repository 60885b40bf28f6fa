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

//! Tracing setup for the scoring runner
//!
//! Each part of the engine logs under its own target: `engine`, `lifecycle`,
//! `undo`, `store`, `sync` and `runner`. `RUST_LOG=engine=debug,sync=info`
//! follows the ball-by-ball flow and the archive uploads only.
//!
//! Events go to `{LOG_DIR}/scoring/scoring.YYYY-MM-DD.log`, one file per UTC
//! day, without colors. `LOG_DIR` defaults to `logs/` under the workspace
//! root. `LOG_TO_CONSOLE=true` mirrors them to stderr.

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::OnceLock,
};

use anyhow::{Context, Result};
use tracing::{Subscriber, info};
use tracing_appender::{
	non_blocking,
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
	EnvFilter, Layer, fmt,
	fmt::{MakeWriter, time::UtcTime},
	layer::SubscriberExt,
	registry::{LookupSpan, Registry},
	util::SubscriberInitExt,
};

use crate::config::{DEFAULT_LOG_TO_CONSOLE, LOG_COMPONENT_NAME};

// Flushes the file writer until exit
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

/// Logging options resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
	level: String,
	dir: PathBuf,
	console: bool,
}

impl LogSettings {
	fn from_env(default_level: &str) -> Self {
		let root = env::var("LOG_DIR")
			.map(PathBuf::from)
			.unwrap_or_else(|_| workspace_root().join("logs"));

		Self {
			level: env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string()),
			dir: root.join(LOG_COMPONENT_NAME),
			console: env::var("LOG_TO_CONSOLE")
				.map(|v| is_enabled(&v))
				.unwrap_or(DEFAULT_LOG_TO_CONSOLE),
		}
	}
}

fn is_enabled(value: &str) -> bool {
	matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

/// Nearest ancestor of the current directory holding a workspace manifest
fn workspace_root() -> PathBuf {
	let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let found = cwd
		.ancestors()
		.find(|dir| {
			fs::read_to_string(dir.join("Cargo.toml")).is_ok_and(|c| c.contains("[workspace]"))
		})
		.map(Path::to_path_buf);

	match found {
		Some(root) => root,
		None => cwd,
	}
}

fn event_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
	fmt::layer()
		.with_writer(writer)
		.with_timer(UtcTime::rfc_3339())
		.with_thread_ids(true)
		.with_target(true)
		.with_ansi(ansi)
}

/// Install the global subscriber
///
/// `default_level` applies when `RUST_LOG` is not set. Fails if a
/// subscriber is already installed.
pub fn init_logging(default_level: &str) -> Result<()> {
	dotenv::dotenv().ok();
	let settings = LogSettings::from_env(default_level);

	fs::create_dir_all(&settings.dir)
		.with_context(|| format!("Failed to create log directory: {}", settings.dir.display()))?;

	let appender = RollingFileAppender::builder()
		.rotation(Rotation::DAILY)
		.filename_prefix(LOG_COMPONENT_NAME)
		.filename_suffix("log")
		.build(&settings.dir)
		.with_context(|| {
			format!("Failed to create rolling log file in {}", settings.dir.display())
		})?;
	let (file_writer, guard) = non_blocking(appender);

	let filter =
		EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new(default_level));

	Registry::default()
		.with(filter)
		.with(event_layer(file_writer, false))
		.with(settings.console.then(|| event_layer(std::io::stderr, true)))
		.try_init()
		.context("Failed to install tracing subscriber")?;

	// Only the installed writer's guard is kept
	LOG_GUARD.set(guard).ok();

	info!(
		target: "runner",
		level = %settings.level,
		dir = %settings.dir.display(),
		console = settings.console,
		"Logging to {}.YYYY-MM-DD.log",
		LOG_COMPONENT_NAME
	);

	Ok(())
}
