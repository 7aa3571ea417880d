//! Frame acquisition for ad clip generation.
//!
//! A frame request first goes to the external extraction tool, which
//! pulls a frame straight from the source video. If that fails for any
//! reason the hosted thumbnail ladder is tried, highest quality first.

pub mod config;
pub mod error;
pub mod provider;
pub mod thumbnail;
pub mod tool;

pub use config::FrameConfig;
pub use error::{FrameError, FrameResult};
pub use provider::{FrameProvider, FrameSource};
pub use thumbnail::ThumbnailClient;
pub use tool::ExtractionTool;
