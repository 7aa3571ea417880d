//! Stitch two generated segments into one continuous clip.

use std::path::Path;
use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::config::{
    MediaConfig, DEFAULT_AUDIO_BITRATE, DEFAULT_AUDIO_CODEC, DEFAULT_CRF, DEFAULT_PRESET,
    DEFAULT_VIDEO_CODEC,
};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, verify_duration};

/// Trim segment B to exactly `keep_seconds_of_b` from its start, then
/// concatenate A followed by trimmed-B into one file.
///
/// Concatenation tries a stream copy first and re-encodes when the copy
/// fails. The working directory is removed on every exit path.
pub async fn stitch(
    segment_a: &[u8],
    segment_b: &[u8],
    keep_seconds_of_b: f64,
    config: &MediaConfig,
) -> MediaResult<Vec<u8>> {
    if keep_seconds_of_b <= 0.0 {
        return Err(MediaError::invalid_duration(format!(
            "keep_seconds_of_b must be positive, got {keep_seconds_of_b}"
        )));
    }

    let workdir = TempDir::new()?;
    let a_path = workdir.path().join("segment_a.mp4");
    let b_path = workdir.path().join("segment_b.mp4");
    let b_trim_path = workdir.path().join("segment_b_trim.mp4");
    let out_path = workdir.path().join("stitched.mp4");

    fs::write(&a_path, segment_a).await?;
    fs::write(&b_path, segment_b).await?;

    let runner = FfmpegRunner::new().with_timeout(config.ffmpeg_timeout_secs);

    // Trim with a re-encode: stream copy can only cut on keyframes
    let trim = FfmpegCommand::new(&b_trim_path)
        .input(&b_path)
        .duration(keep_seconds_of_b)
        .video_codec(DEFAULT_VIDEO_CODEC)
        .preset(DEFAULT_PRESET)
        .crf(DEFAULT_CRF)
        .audio_codec(DEFAULT_AUDIO_CODEC)
        .output_args(["-b:a", DEFAULT_AUDIO_BITRATE])
        .faststart();
    runner.run(&trim).await?;

    let a_info = probe_video(&a_path).await?;
    let expected_secs = a_info.duration + keep_seconds_of_b;

    // Fast path: concat demuxer with stream copy
    let list_path = workdir.path().join("concat.txt");
    fs::write(&list_path, concat_list_body(&[&a_path, &b_trim_path])).await?;

    let copy_concat = FfmpegCommand::new(&out_path)
        .input_with_args(&list_path, ["-f", "concat", "-safe", "0"])
        .stream_copy()
        .faststart();

    match runner.run(&copy_concat).await {
        Ok(()) => debug!("Concatenated segments with stream copy"),
        Err(MediaError::FfmpegFailed { message, .. }) => {
            warn!("Stream-copy concat failed ({}), re-encoding", message);
            reencode_concat(&runner, &a_path, &b_trim_path, &out_path).await?;
        }
        Err(e) => return Err(e),
    }

    verify_duration(&out_path, expected_secs).await?;

    let bytes = fs::read(&out_path).await?;
    info!(
        bytes = bytes.len(),
        target_secs = format!("{:.2}", expected_secs),
        "Stitched two segments into one clip"
    );
    Ok(bytes)
}

/// Concat with the filter graph, re-encoding both streams.
async fn reencode_concat(
    runner: &FfmpegRunner,
    a_path: &Path,
    b_path: &Path,
    out_path: &Path,
) -> MediaResult<()> {
    let a_info = probe_video(a_path).await?;
    let b_info = probe_video(b_path).await?;
    let with_audio = a_info.has_audio && b_info.has_audio;

    let cmd = FfmpegCommand::new(out_path).input(a_path).input(b_path);

    let cmd = if with_audio {
        cmd.filter_complex("[0:v][0:a][1:v][1:a]concat=n=2:v=1:a=1[v][a]")
            .map("[v]")
            .map("[a]")
            .audio_codec(DEFAULT_AUDIO_CODEC)
            .output_args(["-b:a", DEFAULT_AUDIO_BITRATE])
    } else {
        cmd.filter_complex("[0:v][1:v]concat=n=2:v=1[v]")
            .map("[v]")
            .no_audio()
    };

    let cmd = cmd
        .video_codec(DEFAULT_VIDEO_CODEC)
        .preset(DEFAULT_PRESET)
        .crf(DEFAULT_CRF)
        .faststart();

    runner.run(&cmd).await
}

/// Body of a concat demuxer list file.
fn concat_list_body(paths: &[&Path]) -> String {
    paths
        .iter()
        .map(|p| {
            let escaped = p.to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", escaped)
        })
        .collect()
}
