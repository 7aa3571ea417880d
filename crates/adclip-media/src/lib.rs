#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for ad clip post-processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Subprocess execution with bounded timeouts
//! - Stitching two generated segments into one continuous clip
//! - Padding a short clip to a target duration by holding the last frame

pub mod command;
pub mod config;
pub mod error;
pub mod extend;
pub mod probe;
pub mod processor;
pub mod stitch;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use config::MediaConfig;
pub use error::{MediaError, MediaResult};
pub use extend::extend;
pub use probe::{get_duration, probe_video, verify_duration, VideoInfo};
pub use processor::{FfmpegPostProcessor, PostProcessor};
pub use stitch::stitch;
