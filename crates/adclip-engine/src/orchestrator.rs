//! The retry and fallback orchestrator.
//!
//! Attempts are ordered over three dimensions: timestamp candidates
//! (outer), models (middle), safety profiles (inner). Each failure runs
//! through the pure `classify` policy, which decides how far back up the
//! nesting the next attempt starts. Permission and quota errors stop
//! everything; exhaustion surfaces the last concrete error, never an
//! aggregate.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use tracing::{debug, info, warn};

use adclip_cache::CacheStore;
use adclip_frames::FrameSource;
use adclip_genai::{GeneratedClip, SegmentSpec, VideoGenerator};
use adclip_media::PostProcessor;
use adclip_models::{
    AdClipResponse, CacheKey, CachedClip, ExtractedFrame, GenerationRequest, JobId, SafetyProfile,
};

use crate::classify::{classify, Decision};
use crate::config::EngineConfig;
use crate::error::{ClipError, ClipResult};
use crate::plan::{candidate_timestamps, frame_timestamps, plan_generation, GenerationPlan};
use crate::prompt::{build_prompt, SegmentRole};

pub struct ClipEngine {
    config: EngineConfig,
    frames: Arc<dyn FrameSource>,
    generator: Arc<dyn VideoGenerator>,
    post: Arc<dyn PostProcessor>,
    cache: Arc<CacheStore>,
}

impl ClipEngine {
    pub fn new(
        config: EngineConfig,
        frames: Arc<dyn FrameSource>,
        generator: Arc<dyn VideoGenerator>,
        post: Arc<dyn PostProcessor>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            config,
            frames,
            generator,
            post,
            cache,
        }
    }

    /// Produce an ad clip for a validated request, from cache or fresh.
    pub async fn generate_clip(&self, request: GenerationRequest) -> ClipResult<AdClipResponse> {
        let plan = plan_generation(
            request.duration_seconds,
            self.generator.max_single_call_secs(),
        )?;

        let key = CacheKey::for_request(&request);
        if !request.bypass_cache {
            if let Some(clip) = self.cache.get(&key).await {
                info!(key = %key.as_key_string(), "Serving ad clip from cache");
                return Ok(AdClipResponse::from_clip(&clip, true));
            }
        }

        let candidates =
            candidate_timestamps(request.timestamp_seconds, &self.config.timestamp_offsets);
        let mut last_error: Option<ClipError> = None;

        'candidates: for (candidate_index, candidate_ts) in candidates.iter().copied().enumerate()
        {
            let frames = match self.fetch_frames(&request, candidate_ts, plan.is_split()).await {
                Ok(frames) => frames,
                Err(e) => {
                    warn!(
                        candidate = candidate_index,
                        timestamp = candidate_ts,
                        error = %e,
                        "Frames unavailable, skipping candidate"
                    );
                    last_error = Some(e);
                    continue 'candidates;
                }
            };

            for model in &self.config.model_candidates {
                let mut profile_index = 0;
                loop {
                    let profile = self.config.safety_ladder[profile_index];
                    debug!(
                        candidate = candidate_index,
                        model = %model,
                        profile = %profile,
                        "Attempting generation"
                    );

                    let attempt = self
                        .attempt(&request, candidate_ts, &frames, model, profile, plan)
                        .await;

                    match attempt {
                        Ok(clip) => {
                            self.cache.put(&key, clip.clone()).await;
                            info!(
                                model = %model,
                                applied_timestamp = candidate_ts,
                                "Ad clip generated"
                            );
                            return Ok(AdClipResponse::from_clip(&clip, false));
                        }
                        Err(e) => {
                            let decision = classify(&e);
                            warn!(
                                candidate = candidate_index,
                                model = %model,
                                profile = %profile,
                                error = %e,
                                decision = ?decision,
                                "Generation attempt failed"
                            );
                            match decision {
                                Decision::Abort => return Err(e),
                                Decision::RetryProfile => {
                                    last_error = Some(e);
                                    profile_index += 1;
                                    if profile_index >= self.config.safety_ladder.len() {
                                        // Profiles exhausted: this candidate is done,
                                        // remaining models included.
                                        continue 'candidates;
                                    }
                                }
                                Decision::AbandonCandidate => {
                                    last_error = Some(e);
                                    continue 'candidates;
                                }
                                Decision::NextModel => {
                                    last_error = Some(e);
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ClipError::GenerationFailed("no timestamp candidate produced a clip".to_string())
        }))
    }

    /// Fetch the boundary frames for one candidate, in parallel.
    async fn fetch_frames(
        &self,
        request: &GenerationRequest,
        candidate_ts: f64,
        split: bool,
    ) -> ClipResult<Vec<ExtractedFrame>> {
        let timestamps = frame_timestamps(candidate_ts, request.duration_seconds, split);

        if split {
            let (first, middle, last) = tokio::try_join!(
                self.frames.get_frame(&request.video_id, timestamps[0]),
                self.frames.get_frame(&request.video_id, timestamps[1]),
                self.frames.get_frame(&request.video_id, timestamps[2]),
            )?;
            Ok(vec![first, middle, last])
        } else {
            let (first, last) = tokio::try_join!(
                self.frames.get_frame(&request.video_id, timestamps[0]),
                self.frames.get_frame(&request.video_id, timestamps[1]),
            )?;
            Ok(vec![first, last])
        }
    }

    /// One full attempt: generate, assemble to the exact duration, record.
    async fn attempt(
        &self,
        request: &GenerationRequest,
        candidate_ts: f64,
        frames: &[ExtractedFrame],
        model: &str,
        profile: SafetyProfile,
        plan: GenerationPlan,
    ) -> ClipResult<CachedClip> {
        let (bytes, mime_type, source_uri) = match plan {
            GenerationPlan::Single { model_duration_secs } => {
                let spec = self.segment_spec(
                    request,
                    model,
                    profile,
                    SegmentRole::Full,
                    frames[0].clone(),
                    Some(frames[1].clone()),
                    model_duration_secs,
                );
                let clip = self.generator.generate(&spec).await?;

                let actual_secs = self.post.clip_duration(&clip.bytes).await?;
                let hold_secs = request.duration_seconds - actual_secs;
                let bytes = self.post.extend(&clip.bytes, hold_secs).await?;
                (bytes, clip.mime_type, clip.source_uri)
            }
            GenerationPlan::Split { segment_duration_secs } => {
                let spec_a = self.segment_spec(
                    request,
                    model,
                    profile,
                    SegmentRole::FirstHalf,
                    frames[0].clone(),
                    Some(frames[1].clone()),
                    segment_duration_secs,
                );
                let spec_b = self.segment_spec(
                    request,
                    model,
                    profile,
                    SegmentRole::SecondHalf,
                    frames[1].clone(),
                    Some(frames[2].clone()),
                    segment_duration_secs,
                );

                let (clip_a, clip_b): (GeneratedClip, GeneratedClip) = tokio::try_join!(
                    self.generator.generate(&spec_a),
                    self.generator.generate(&spec_b),
                )?;

                let a_secs = self.post.clip_duration(&clip_a.bytes).await?;
                let keep_b_secs = request.duration_seconds - a_secs;
                let bytes = self
                    .post
                    .stitch(&clip_a.bytes, &clip_b.bytes, keep_b_secs)
                    .await?;
                (bytes, clip_a.mime_type, None)
            }
        };

        let video_url = format!("data:{};base64,{}", mime_type, BASE64.encode(&bytes));

        Ok(CachedClip {
            job_id: JobId::new(),
            model_used: model.to_string(),
            mime_type,
            source_uri,
            video_url,
            cached_at: Utc::now(),
            requested_timestamp_seconds: request.timestamp_seconds,
            applied_timestamp_seconds: candidate_ts,
            person_generation_profile_used: profile.person_generation.to_string(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn segment_spec(
        &self,
        request: &GenerationRequest,
        model: &str,
        profile: SafetyProfile,
        role: SegmentRole,
        first_frame: ExtractedFrame,
        last_frame: Option<ExtractedFrame>,
        duration_seconds: u32,
    ) -> SegmentSpec {
        SegmentSpec {
            model: model.to_string(),
            prompt: build_prompt(request, role),
            first_frame,
            last_frame,
            duration_seconds,
            aspect_ratio: request.aspect_ratio,
            resolution: request.resolution,
            safety: profile,
            seed: request.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use adclip_cache::CacheConfig;
    use adclip_frames::{FrameError, FrameResult};
    use adclip_genai::{GenAiError, GenAiResult};
    use adclip_media::{MediaError, MediaResult};
    use adclip_models::{
        AdStyle, AspectRatio, PersonGeneration, ProductDescriptor, Resolution,
    };

    struct FakeFrames {
        fail_at: Vec<f64>,
        calls: Mutex<Vec<f64>>,
    }

    impl FakeFrames {
        fn new(fail_at: Vec<f64>) -> Arc<Self> {
            Arc::new(Self {
                fail_at,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FrameSource for FakeFrames {
        async fn get_frame(
            &self,
            video_id: &str,
            timestamp_seconds: f64,
        ) -> FrameResult<ExtractedFrame> {
            self.calls.lock().unwrap().push(timestamp_seconds);
            if self
                .fail_at
                .iter()
                .any(|t| (t - timestamp_seconds).abs() < 1e-9)
            {
                return Err(FrameError::Unavailable {
                    video_id: video_id.to_string(),
                    timestamp_seconds,
                });
            }
            Ok(ExtractedFrame::new("image/jpeg", "ZnJhbWU="))
        }
    }

    struct FakeGenerator {
        script: Mutex<VecDeque<GenAiResult<GeneratedClip>>>,
        specs: Mutex<Vec<SegmentSpec>>,
    }

    impl FakeGenerator {
        fn new(script: Vec<GenAiResult<GeneratedClip>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                specs: Mutex::new(Vec::new()),
            })
        }

        fn ok_clip() -> GeneratedClip {
            GeneratedClip {
                bytes: b"generated".to_vec(),
                mime_type: "video/mp4".to_string(),
                source_uri: None,
            }
        }

        fn call_count(&self) -> usize {
            self.specs.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl VideoGenerator for FakeGenerator {
        async fn generate(&self, spec: &SegmentSpec) -> GenAiResult<GeneratedClip> {
            self.specs.lock().unwrap().push(spec.clone());
            match self.script.lock().unwrap().pop_front() {
                Some(result) => result,
                None => Ok(Self::ok_clip()),
            }
        }

        fn max_single_call_secs(&self) -> f64 {
            8.0
        }
    }

    struct FakePost {
        duration_secs: f64,
        fail_extends: AtomicUsize,
        keeps: Mutex<Vec<f64>>,
    }

    impl FakePost {
        fn new(duration_secs: f64) -> Arc<Self> {
            Arc::new(Self {
                duration_secs,
                fail_extends: AtomicUsize::new(0),
                keeps: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PostProcessor for FakePost {
        async fn stitch(
            &self,
            segment_a: &[u8],
            segment_b: &[u8],
            keep_seconds_of_b: f64,
        ) -> MediaResult<Vec<u8>> {
            if keep_seconds_of_b <= 0.0 {
                return Err(MediaError::invalid_duration("nothing left of segment B"));
            }
            self.keeps.lock().unwrap().push(keep_seconds_of_b);
            let mut joined = segment_a.to_vec();
            joined.extend_from_slice(segment_b);
            Ok(joined)
        }

        async fn extend(&self, clip: &[u8], hold_seconds: f64) -> MediaResult<Vec<u8>> {
            if self.fail_extends.load(Ordering::SeqCst) > 0 {
                self.fail_extends.fetch_sub(1, Ordering::SeqCst);
                return Err(MediaError::ffmpeg_failed("tpad failed", None, Some(1)));
            }
            if hold_seconds <= 0.0 {
                return Ok(clip.to_vec());
            }
            let mut padded = clip.to_vec();
            padded.extend_from_slice(b"+pad");
            Ok(padded)
        }

        async fn clip_duration(&self, _clip: &[u8]) -> MediaResult<f64> {
            Ok(self.duration_secs)
        }
    }

    struct Harness {
        engine: ClipEngine,
        frames: Arc<FakeFrames>,
        generator: Arc<FakeGenerator>,
        post: Arc<FakePost>,
        _cache_dir: TempDir,
    }

    fn test_config() -> EngineConfig {
        EngineConfig {
            timestamp_offsets: vec![0.0, 3.0, -3.0],
            model_candidates: vec!["model-a".to_string(), "model-b".to_string()],
            safety_ladder: SafetyProfile::default_ladder(),
        }
    }

    fn harness(
        config: EngineConfig,
        frames_fail_at: Vec<f64>,
        script: Vec<GenAiResult<GeneratedClip>>,
        clip_secs: f64,
    ) -> Harness {
        let cache_dir = TempDir::new().unwrap();
        let cache = CacheStore::shared(CacheConfig {
            dir: cache_dir.path().to_path_buf(),
            memory_capacity: 8,
        });
        let frames = FakeFrames::new(frames_fail_at);
        let generator = FakeGenerator::new(script);
        let post = FakePost::new(clip_secs);
        let engine = ClipEngine::new(
            config,
            frames.clone(),
            generator.clone(),
            post.clone(),
            cache,
        );
        Harness {
            engine,
            frames,
            generator,
            post,
            _cache_dir: cache_dir,
        }
    }

    fn request(duration_seconds: f64) -> GenerationRequest {
        GenerationRequest {
            video_id: "vid123".to_string(),
            timestamp_seconds: 42.0,
            duration_seconds,
            product: ProductDescriptor {
                brand: "Aurora".to_string(),
                product: "Trail Shoe".to_string(),
                tagline: "Run anywhere".to_string(),
                visual_description: "Blue trail running shoe".to_string(),
                action_script: "Runner sprints along a ridge".to_string(),
                benefits: vec![
                    "grip".to_string(),
                    "cushion".to_string(),
                    "breathable".to_string(),
                ],
                gradient_colors: vec!["#0af".to_string(), "#f50".to_string()],
            },
            scene_context: None,
            style: AdStyle::Cinematic,
            aspect_ratio: AspectRatio::LANDSCAPE,
            resolution: Resolution::P720,
            seed: None,
            bypass_cache: false,
        }
    }

    fn blocked() -> GenAiError {
        GenAiError::job_failed("Input image was blocked by Responsible AI safety filters")
    }

    #[tokio::test]
    async fn test_duration_beyond_two_segments_rejected() {
        let h = harness(test_config(), vec![], vec![], 6.0);

        let err = h.engine.generate_clip(request(17.0)).await.unwrap_err();

        assert!(matches!(err, ClipError::InvalidRequest(_)));
        assert_eq!(h.frames.call_count(), 0);
        assert_eq!(h.generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_identical_request_is_a_cache_hit() {
        let h = harness(test_config(), vec![], vec![], 6.0);

        let first = h.engine.generate_clip(request(6.0)).await.unwrap();
        assert!(!first.cache_hit);

        let second = h.engine.generate_clip(request(6.0)).await.unwrap();
        assert!(second.cache_hit);
        assert_eq!(second.job_id, first.job_id);
        assert_eq!(h.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_blocked_input_walks_profiles_then_shifts_timestamp() {
        let h = harness(
            test_config(),
            vec![],
            vec![Err(blocked()), Err(blocked())],
            6.0,
        );

        let response = h.engine.generate_clip(request(6.0)).await.unwrap();

        assert!(!response.cache_hit);
        assert_eq!(response.requested_timestamp_seconds, 42.0);
        assert_eq!(response.applied_timestamp_seconds, 45.0);
        assert_eq!(h.generator.call_count(), 3);

        let specs = h.generator.specs.lock().unwrap();
        assert_eq!(specs[0].safety.person_generation, PersonGeneration::AllowAdult);
        assert_eq!(specs[1].safety.person_generation, PersonGeneration::AllowAll);
        assert_eq!(specs[2].safety.person_generation, PersonGeneration::AllowAdult);
        // The blocked candidate never reaches the second model.
        assert!(specs.iter().all(|s| s.model == "model-a"));
    }

    #[tokio::test]
    async fn test_permission_denied_stops_all_fallback() {
        let h = harness(
            test_config(),
            vec![],
            vec![Err(GenAiError::PermissionDenied(
                "API key not authorized".to_string(),
            ))],
            6.0,
        );

        let err = h.engine.generate_clip(request(6.0)).await.unwrap_err();

        assert!(matches!(err, ClipError::PermissionDenied(_)));
        assert_eq!(h.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_frames_skip_candidate_without_generating() {
        // The opening frame at 42.0 cannot be produced.
        let h = harness(test_config(), vec![42.0], vec![], 6.0);

        let response = h.engine.generate_clip(request(6.0)).await.unwrap();

        assert_eq!(response.applied_timestamp_seconds, 45.0);
        assert_eq!(h.generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generic_failure_falls_to_next_model_same_timestamp() {
        let h = harness(
            test_config(),
            vec![],
            vec![Err(GenAiError::job_failed("backend exploded"))],
            6.0,
        );

        let response = h.engine.generate_clip(request(6.0)).await.unwrap();

        assert_eq!(response.model_used, "model-b");
        assert_eq!(response.applied_timestamp_seconds, 42.0);

        let specs = h.generator.specs.lock().unwrap();
        assert_eq!(specs.len(), 2);
        // Profile ladder restarts with the model change.
        assert_eq!(specs[1].safety.person_generation, PersonGeneration::AllowAdult);
    }

    #[tokio::test]
    async fn test_post_processing_failure_falls_to_next_model() {
        let h = harness(test_config(), vec![], vec![], 5.5);
        h.post.fail_extends.store(1, Ordering::SeqCst);

        let response = h.engine.generate_clip(request(6.0)).await.unwrap();

        assert_eq!(response.model_used, "model-b");
        assert_eq!(h.generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_long_clip_splits_and_stitches_to_target() {
        let h = harness(test_config(), vec![], vec![], 6.0);

        let response = h.engine.generate_clip(request(12.0)).await.unwrap();
        assert!(!response.cache_hit);
        assert_eq!(h.generator.call_count(), 2);

        let mut frame_calls = h.frames.calls.lock().unwrap().clone();
        frame_calls.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(frame_calls, vec![42.0, 48.0, 54.0]);

        let specs = h.generator.specs.lock().unwrap();
        assert!(specs.iter().all(|s| s.duration_seconds == 6));

        // Segment B is trimmed to exactly what the target needs.
        let keeps = h.post.keeps.lock().unwrap().clone();
        assert_eq!(keeps, vec![6.0]);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_last_error() {
        let config = EngineConfig {
            timestamp_offsets: vec![0.0],
            model_candidates: vec!["model-a".to_string(), "model-b".to_string()],
            safety_ladder: SafetyProfile::default_ladder(),
        };
        let h = harness(
            config,
            vec![],
            vec![
                Err(GenAiError::job_failed("first boom")),
                Err(GenAiError::job_failed("second boom")),
            ],
            6.0,
        );

        let err = h.engine.generate_clip(request(6.0)).await.unwrap_err();

        match err {
            ClipError::GenerationFailed(msg) => assert!(msg.contains("second boom")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_bypass_cache_regenerates_and_overwrites() {
        let h = harness(test_config(), vec![], vec![], 6.0);

        let first = h.engine.generate_clip(request(6.0)).await.unwrap();

        let mut forced = request(6.0);
        forced.bypass_cache = true;
        let second = h.engine.generate_clip(forced).await.unwrap();
        assert!(!second.cache_hit);
        assert_ne!(second.job_id, first.job_id);
        assert_eq!(h.generator.call_count(), 2);

        // The forced run still wrote through: the next plain request
        // serves the regenerated clip.
        let third = h.engine.generate_clip(request(6.0)).await.unwrap();
        assert!(third.cache_hit);
        assert_eq!(third.job_id, second.job_id);
    }
}
