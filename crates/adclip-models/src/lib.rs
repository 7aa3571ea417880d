//! Shared data models for the AdClip backend.
//!
//! This crate provides Serde-serializable types for:
//! - Inbound generation requests and the product descriptor
//! - Cache keys and cached clip records
//! - Safety profiles for the generative video model
//! - Extracted boundary frames
//! - The outbound ad clip response

pub mod clip;
pub mod frame;
pub mod key;
pub mod product;
pub mod request;
pub mod safety;
pub mod style;

// Re-export common types
pub use clip::{AdClipResponse, CachedClip, ClipStatus, JobId};
pub use frame::ExtractedFrame;
pub use key::CacheKey;
pub use product::ProductDescriptor;
pub use request::{AdClipRequest, GenerationRequest};
pub use safety::{PersonGeneration, SafetyProfile};
pub use style::{AdStyle, AspectRatio, Resolution};
