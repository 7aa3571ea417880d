//! Pad a short clip to a target duration by holding the last frame.

use std::path::Path;
use tempfile::TempDir;
use tokio::fs;
use tracing::{info, warn};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::config::{
    MediaConfig, DEFAULT_AUDIO_BITRATE, DEFAULT_AUDIO_CODEC, DEFAULT_CRF, DEFAULT_PRESET,
    DEFAULT_VIDEO_CODEC,
};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, verify_duration};

/// Extend a clip by `hold_seconds`, cloning the final frame and padding
/// audio with silence. `hold_seconds <= 0` returns the clip unchanged.
///
/// If the audio-pad variant fails, the video-only pad keeps the original
/// audio track as-is.
pub async fn extend(clip: &[u8], hold_seconds: f64, config: &MediaConfig) -> MediaResult<Vec<u8>> {
    if hold_seconds <= 0.0 {
        return Ok(clip.to_vec());
    }

    let workdir = TempDir::new()?;
    let in_path = workdir.path().join("clip.mp4");
    let out_path = workdir.path().join("extended.mp4");
    fs::write(&in_path, clip).await?;

    let info = probe_video(&in_path).await?;
    let expected_secs = info.duration + hold_seconds;
    let runner = FfmpegRunner::new().with_timeout(config.ffmpeg_timeout_secs);

    if info.has_audio {
        let padded = pad_command(&in_path, &out_path, hold_seconds)
            .audio_filter(format!("apad=pad_dur={:.3}", hold_seconds))
            .audio_codec(DEFAULT_AUDIO_CODEC)
            .output_args(["-b:a", DEFAULT_AUDIO_BITRATE]);

        match runner.run(&padded).await {
            Ok(()) => {}
            Err(MediaError::FfmpegFailed { message, .. }) => {
                warn!("Audio pad failed ({}), padding video only", message);
                let video_only =
                    pad_command(&in_path, &out_path, hold_seconds).audio_codec("copy");
                runner.run(&video_only).await?;
            }
            Err(e) => return Err(e),
        }
    } else {
        let video_only = pad_command(&in_path, &out_path, hold_seconds).no_audio();
        runner.run(&video_only).await?;
    }

    verify_duration(&out_path, expected_secs).await?;

    let bytes = fs::read(&out_path).await?;
    info!(
        bytes = bytes.len(),
        hold_secs = format!("{:.2}", hold_seconds),
        "Extended clip by holding the final frame"
    );
    Ok(bytes)
}

/// Base command padding video by cloning the last frame.
fn pad_command(in_path: &Path, out_path: &Path, hold_seconds: f64) -> FfmpegCommand {
    FfmpegCommand::new(out_path)
        .input(in_path)
        .video_filter(format!(
            "tpad=stop_mode=clone:stop_duration={:.3}",
            hold_seconds
        ))
        .video_codec(DEFAULT_VIDEO_CODEC)
        .preset(DEFAULT_PRESET)
        .crf(DEFAULT_CRF)
        .faststart()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_hold_returns_clip_unchanged() {
        let clip = vec![1u8, 2, 3, 4];
        let config = MediaConfig::default();
        let result = extend(&clip, 0.0, &config).await.unwrap();
        assert_eq!(result, clip);
    }

    #[tokio::test]
    async fn test_negative_hold_returns_clip_unchanged() {
        let clip = vec![9u8; 32];
        let config = MediaConfig::default();
        let result = extend(&clip, -3.5, &config).await.unwrap();
        assert_eq!(result, clip);
    }

    #[test]
    fn test_pad_command_args() {
        let cmd = pad_command(Path::new("in.mp4"), Path::new("out.mp4"), 2.5);
        let args = cmd.build_args();
        assert!(args.contains(&"tpad=stop_mode=clone:stop_duration=2.500".to_string()));
        assert!(args.contains(&"-vf".to_string()));
    }
}
