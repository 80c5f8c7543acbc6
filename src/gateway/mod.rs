//! Mock build gateway
//!
//! Simulates the console's `POST /v2/gemini/pages` endpoint: a fixed accept
//! latency, a freshly minted container id, and a `202 Accepted` envelope
//! pointing at the monitor. There is no real network and no failure mode;
//! the minted container id is the natural run token for the sequencer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Simulated latency before the gateway accepts a request
pub const ACCEPT_LATENCY: Duration = Duration::from_millis(500);

/// Length of the random suffix in a minted container id
const CONTAINER_SUFFIX_LEN: usize = 12;

/// Request payload for an orchestrated build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Operator prompt describing the build
    pub prompt: String,

    /// Orchestrator conducting the build
    pub orchestrator: String,
}

impl SubmitRequest {
    /// Request conducted by the default orchestrator
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            orchestrator: "Maestro".to_string(),
        }
    }
}

/// Response envelope mirroring the mock HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// HTTP-style status code (always 202)
    pub status: u16,

    /// HTTP-style status text
    pub status_text: String,

    /// Response body
    pub data: SubmitBody,
}

/// Body of an accepted submit response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitBody {
    /// Build status, always "pending" at accept time
    pub status: String,

    /// Human-readable acceptance message
    pub message: String,

    /// Minted container id; use as the run token
    pub container_id: String,

    /// Monitor path for this container
    pub monitor_url: String,
}

impl SubmitResponse {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Mint a container id in the `cntr_` namespace
pub fn mint_container_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("cntr_{}", &suffix[..CONTAINER_SUFFIX_LEN])
}

/// Accept a submit request after the simulated latency.
///
/// Deterministic data copy apart from the minted id; cannot fail.
pub async fn submit(request: &SubmitRequest) -> SubmitResponse {
    tokio::time::sleep(ACCEPT_LATENCY).await;

    let container_id = mint_container_id();
    info!(
        container_id = %container_id,
        orchestrator = %request.orchestrator,
        "build accepted"
    );

    SubmitResponse {
        status: 202,
        status_text: "Accepted".to_string(),
        data: SubmitBody {
            status: "pending".to_string(),
            message: "Orchestrated build initiated.".to_string(),
            monitor_url: format!("/v2/gemini/containers/{}", container_id),
            container_id,
        },
    }
}
