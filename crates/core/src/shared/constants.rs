/// Thread ceiling used when the host cannot report its concurrency.
pub const FALLBACK_MAX_THREADS: usize = 4;

/// Divisor mapping signed 16-bit PCM onto [-1.0, 1.0).
pub const PCM_NORMALIZER: f32 = 32768.0;

/// Sample rate the bundled whisper models are trained on.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// `audio_ctx` value telling the engine to use its full audio context window.
pub const FULL_AUDIO_CONTEXT: i32 = 0;

/// Language argument that makes whisper.cpp detect the spoken language itself.
pub const AUTO_LANGUAGE: &str = "auto";

pub const ERROR_CONTEXT_NOT_INITIALIZED: &str = "context_not_initialized";
pub const ERROR_EMPTY_AUDIO: &str = "empty_audio";
pub const ERROR_INFERENCE_FAILED: &str = "inference_failed";
