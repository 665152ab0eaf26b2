//! # intune-core
//!
//! Pipeline engine for the intune voice care assistant.
//!
//! Contains the stage traits, the crisis risk scorer and escalation ladder,
//! the latency ledger, the orchestrator, and the simulated and live
//! collaborator adapters wired up by [`bootstrap`].

pub mod pipeline;
pub mod simulated;
pub mod live;
pub mod bootstrap;

pub use bootstrap::build_pipeline;
pub use pipeline::{Collaborators, Pipeline};
