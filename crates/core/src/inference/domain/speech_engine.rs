use std::path::Path;

use crate::shared::errors::EngineError;

use super::inference_params::InferenceParams;

/// Engine-internal numeric language identifier.
pub type LanguageId = i32;

/// Domain interface for a speech-recognition engine.
///
/// Loads model files into independent contexts. Implementations must be
/// shareable across sessions; each context they hand out is exclusively owned.
pub trait SpeechEngine: Send + Sync {
    fn load(&self, model_path: &Path) -> Result<Box<dyn EngineContext>, EngineError>;
}

/// One loaded model plus the decoder state of its most recent inference pass.
pub trait EngineContext: Send {
    /// Runs one full inference pass over `samples`.
    fn infer(&mut self, params: &InferenceParams, samples: &[f32]) -> Result<(), EngineError>;

    /// Number of segments produced by the last successful `infer`.
    fn segment_count(&self) -> usize;

    /// Raw UTF-8 bytes of segment `index`, or `None` when the engine has no
    /// text for it. A multi-byte character may straddle two segments.
    fn segment_text(&self, index: usize) -> Option<Vec<u8>>;

    fn language_id(&self, code: &str) -> Option<LanguageId>;

    fn language_code(&self, id: LanguageId) -> Option<String>;

    fn max_language_id(&self) -> LanguageId;

    /// Best-guess spoken language for `samples`, or `None` if detection failed.
    fn detect_language(&mut self, samples: &[f32], threads: usize) -> Option<LanguageId>;
}
