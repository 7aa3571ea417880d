//! Ad clip generation orchestrator.
//!
//! Turns a validated request into a finished, duration-exact clip by
//! coordinating frame extraction, the generative video backend and
//! ffmpeg assembly, with caching in front. Failures walk a fixed
//! fallback order: safety profile, then model, then timestamp
//! candidate. The decision policy lives in [`classify`] and is pure;
//! the I/O lives in [`ClipEngine`].

pub mod classify;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod prompt;

pub use classify::{classify, Decision};
pub use config::EngineConfig;
pub use error::{ClipError, ClipResult};
pub use orchestrator::ClipEngine;
pub use plan::{candidate_timestamps, plan_generation, GenerationPlan};
