//! # Narration Core
//!
//! The engine that watches a moving probe over the map. This crate reads marks from
//! `mark_rules`, classifies where the probe stands relative to the nearest mark, and
//! decides when that relationship has settled long enough to narrate.
//!
//! ## Core Components
//!
//! - **observation**: Per-tick probe evaluation into a situation, label and direction
//! - **trigger**: Stability and cooldown state machine gating narration
//! - **simulation**: Mode-aware driver tying observation, trigger and prompt together
//! - **events**: Narration requests and the sink that receives them
//!
//! ## Design Philosophy
//!
//! - **Host-Agnostic**: The host calls `tick` once per frame; nothing here owns a loop
//! - **Fire-and-Forget**: Requests are handed to a sink and never awaited
//! - **Deterministic**: Identical ticks over identical marks produce identical decisions

pub mod config;
pub mod events;
pub mod observation;
pub mod prompt;
pub mod simulation;
pub mod trigger;

pub use config::*;
pub use events::*;
pub use observation::*;
pub use prompt::*;
pub use simulation::*;
pub use trigger::*;
