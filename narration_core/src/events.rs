//! Narration requests and the sink that consumes them.

use mark_rules::Sector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::observation::{Observation, Situation};

/// Unique identifier for narration requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Create a new random request ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finalized request handed to the narration collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub id: RequestId,
    pub label: String,
    pub situation: Situation,
    pub sector: Sector,

    /// The situation sentence, e.g. "The user is right inside the Plaza."
    pub message: String,

    pub keyword: String,
    pub details: String,

    /// Full prompt text for generation.
    pub prompt: String,
}

impl NarrationRequest {
    /// Build a request from a fired observation. Returns `None` if nothing is in range.
    pub fn from_observation(observation: &Observation, prompt: String) -> Option<Self> {
        let label = observation.label.clone()?;
        if observation.situation == Situation::None {
            return None;
        }
        Some(Self {
            id: RequestId::new(),
            label,
            situation: observation.situation,
            sector: observation.sector,
            message: observation.message(),
            keyword: observation.keyword.clone(),
            details: observation.details.clone(),
            prompt,
        })
    }

    /// JSON payload for sinks that forward requests out of process.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Receives narration requests. Generation and playback happen on the sink's side;
/// the engine never waits for them.
pub trait NarrationSink {
    fn narrate(&mut self, request: NarrationRequest);
}

impl<F> NarrationSink for F
where
    F: FnMut(NarrationRequest),
{
    fn narrate(&mut self, request: NarrationRequest) {
        self(request)
    }
}

/// A sink that keeps every request it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub requests: Vec<NarrationRequest>,
}

impl RecordingSink {
    /// Create a new empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels of the received requests, oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.requests.iter().map(|r| r.label.as_str()).collect()
    }
}

impl NarrationSink for RecordingSink {
    fn narrate(&mut self, request: NarrationRequest) {
        self.requests.push(request);
    }
}
