//! Client for the generative video model.
//!
//! Generation is a long-running job: submit returns an operation name,
//! the operation is polled at a fixed interval until done, and the
//! finished video reference is resolved into bytes through a chain of
//! strategies (inline payload, HTTP download, bucket tool, temp file).

pub mod client;
pub mod config;
pub mod error;
pub mod generator;
mod resolve;

pub use client::{GenAiClient, GeneratedClip, JobHandle, PollOutcome, VideoPayload};
pub use config::GenAiConfig;
pub use error::{GenAiError, GenAiResult};
pub use generator::{SegmentSpec, VideoGenerator};
