use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::audio::domain::pcm_decoder;
use crate::inference::domain::inference_params::InferenceParams;
use crate::inference::domain::language_selection::LanguageSelection;
use crate::inference::domain::speech_engine::{EngineContext, SpeechEngine};
use crate::inference::domain::thread_resolver::{host_max_threads, resolve_threads, threads_for_request};
use crate::shared::errors::{BridgeError, InitError};

use super::session_logger::SessionLogger;

/// One transcription call as received from the host.
#[derive(Clone, Debug, Default)]
pub struct InferenceRequest {
    pub audio: Vec<u8>,
    pub sample_rate: u32,
    pub source_language: Option<String>,
    /// Accepted for the wire contract; translation output never depends on it.
    pub target_language: Option<String>,
    pub translate: bool,
    /// Per-call thread count; zero or negative uses the session default.
    pub thread_override: i32,
}

impl InferenceRequest {
    pub fn new(audio: Vec<u8>, sample_rate: u32) -> Self {
        Self {
            audio,
            sample_rate,
            ..Self::default()
        }
    }

    pub fn with_source_language(mut self, code: impl Into<String>) -> Self {
        self.source_language = Some(code.into());
        self
    }

    pub fn with_target_language(mut self, code: impl Into<String>) -> Self {
        self.target_language = Some(code.into());
        self
    }

    pub fn with_translate(mut self, translate: bool) -> Self {
        self.translate = translate;
        self
    }

    pub fn with_thread_override(mut self, threads: i32) -> Self {
        self.thread_override = threads;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InferenceResult {
    pub transcript: String,
    pub translation: String,
    /// Detected or requested language code; empty when unresolved.
    pub language: String,
}

/// A loaded engine context plus the thread budget it was created with.
pub struct Session {
    context: Box<dyn EngineContext>,
    max_threads: usize,
    default_threads: usize,
    logger: Arc<dyn SessionLogger>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("max_threads", &self.max_threads)
            .field("default_threads", &self.default_threads)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Loads `model_path` through `engine`, sizing threads from the host.
    pub fn create(
        engine: &dyn SpeechEngine,
        model_path: &Path,
        preferred_threads: i32,
        logger: Arc<dyn SessionLogger>,
    ) -> Result<Self, InitError> {
        if model_path.as_os_str().is_empty() {
            return Err(InitError::EmptyModelPath);
        }
        if !model_path.exists() {
            return Err(InitError::ModelNotFound(model_path.to_path_buf()));
        }
        let context = engine.load(model_path)?;
        Ok(Self::from_context(
            context,
            host_max_threads(),
            preferred_threads,
            logger,
        ))
    }

    /// Wraps an already loaded context. `max_threads` of zero is treated as one.
    pub fn from_context(
        context: Box<dyn EngineContext>,
        max_threads: usize,
        preferred_threads: i32,
        logger: Arc<dyn SessionLogger>,
    ) -> Self {
        let max_threads = max_threads.max(1);
        Self {
            context,
            max_threads,
            default_threads: resolve_threads(preferred_threads, max_threads),
            logger,
        }
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    pub fn default_threads(&self) -> usize {
        self.default_threads
    }

    /// Runs one non-retried inference pass for `request`.
    pub fn process(&mut self, request: &InferenceRequest) -> Result<InferenceResult, BridgeError> {
        if request.audio.is_empty() {
            return Err(BridgeError::EmptyAudio);
        }

        let started = Instant::now();
        let audio = pcm_decoder::decode_segment(&request.audio, request.sample_rate);
        self.logger.timing("decode", elapsed_ms(started));

        let threads =
            threads_for_request(request.thread_override, self.max_threads, self.default_threads);
        let language =
            LanguageSelection::resolve(request.source_language.as_deref(), &*self.context);
        let params = InferenceParams::for_request(threads, request.translate, language);

        let started = Instant::now();
        self.context
            .infer(&params, audio.samples())
            .map_err(|_| BridgeError::InferenceFailed)?;
        self.logger.timing("inference", elapsed_ms(started));

        let transcript_bytes: Vec<u8> = (0..self.context.segment_count())
            .filter_map(|index| self.context.segment_text(index))
            .flatten()
            .collect();
        let transcript = String::from_utf8_lossy(&transcript_bytes).into_owned();

        let started = Instant::now();
        let language = params
            .language
            .reported_code(&mut *self.context, audio.samples(), threads);
        if params.detect_language() {
            self.logger.timing("language", elapsed_ms(started));
        }
        self.logger.audio_processed(audio.duration());

        // No separate translation step: with `translate` set the engine already
        // emitted translated segments, and other targets are not supported.
        let translation = transcript.clone();

        Ok(InferenceResult {
            transcript,
            translation,
            language,
        })
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
