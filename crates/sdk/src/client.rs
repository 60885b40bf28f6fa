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

use crate::types::{CompletedMatch, SyncAck};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use thiserror::Error;

/// Error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
	#[error("Network error: {0}")]
	Network(String),
	#[error("Serialization error: {0}")]
	Serialization(String),
	#[error("Server error: {0}")]
	Server(String),
	#[error("Client setup error: {0}")]
	Setup(String),
}

impl ClientError {
	/// Whether retrying the same request later may succeed
	pub fn is_transient(&self) -> bool {
		match self {
			ClientError::Network(_) => true,
			ClientError::Server(msg) => msg.starts_with('5'),
			ClientError::Serialization(_) | ClientError::Setup(_) => false,
		}
	}
}

/// Client for the remote match archive
///
/// This is an async client interface using reqwest for HTTP communication.
/// Uploads are idempotent upserts keyed by match id, and per-player rows by
/// `(match_id, player_id)`, so resending a record is always safe.
pub struct Client {
	base_url: String,
	client: ReqwestClient,
}

impl Client {
	/// Create a new client with the given base URL
	pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
		Self::with_config(base_url, Duration::from_secs(30))
	}

	/// Create a new client with a custom request timeout
	pub fn with_config(
		base_url: impl Into<String>,
		timeout: Duration,
	) -> Result<Self, ClientError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ClientError::Setup(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			base_url: base_url.into().trim_end_matches('/').to_string(),
			client,
		})
	}

	/// Upsert a completed match and its player performance rows
	pub async fn upsert_match(&self, record: &CompletedMatch) -> Result<SyncAck, ClientError> {
		let url = format!("{}/api/v1/matches/{}", self.base_url, record.match_id);

		let response = self
			.client
			.put(&url)
			.json(record)
			.send()
			.await
			.map_err(|e| ClientError::Network(format!("Request failed: {}", e)))?;

		if !response.status().is_success() {
			let status = response.status();
			let error_text = response
				.text()
				.await
				.unwrap_or_else(|_| format!("HTTP {}", status));
			return Err(ClientError::Server(format!("{}: {}", status, error_text)));
		}

		let ack: SyncAck = response
			.json()
			.await
			.map_err(|e| ClientError::Serialization(format!("Failed to parse response: {}", e)))?;

		Ok(ack)
	}

	/// Check archive health
	pub async fn health_check(&self) -> Result<bool, ClientError> {
		let url = format!("{}/health", self.base_url);

		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| ClientError::Network(format!("Request failed: {}", e)))?;

		Ok(response.status().is_success())
	}
}

/// Synchronous client wrapper
///
/// This wraps the async client and runs it in a tokio runtime. The scoring
/// engine is synchronous, so its sync worker thread drives uploads through
/// this wrapper.
pub struct SyncClient {
	client: Client,
	runtime: tokio::runtime::Runtime,
}

impl SyncClient {
	/// Create a new synchronous client
	pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
		let runtime = tokio::runtime::Runtime::new()
			.map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;
		let client = Client::with_config(base_url, timeout)?;
		Ok(Self { client, runtime })
	}

	/// Upsert a completed match (synchronous)
	pub fn upsert_match(&self, record: &CompletedMatch) -> Result<SyncAck, ClientError> {
		self.runtime.block_on(self.client.upsert_match(record))
	}

	/// Check archive health (synchronous)
	pub fn health_check(&self) -> Result<bool, ClientError> {
		self.runtime.block_on(self.client.health_check())
	}
}
