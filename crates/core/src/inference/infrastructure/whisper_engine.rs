use std::path::Path;

use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState,
};

use crate::inference::domain::inference_params::InferenceParams;
use crate::inference::domain::language_selection::LanguageSelection;
use crate::inference::domain::speech_engine::{EngineContext, LanguageId, SpeechEngine};
use crate::shared::constants::AUTO_LANGUAGE;
use crate::shared::errors::EngineError;

/// Speech engine backed by whisper.cpp via whisper-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhisperEngine {
    use_gpu: bool,
}

impl WhisperEngine {
    pub fn new(use_gpu: bool) -> Self {
        Self { use_gpu }
    }

    pub fn use_gpu(&self) -> bool {
        self.use_gpu
    }
}

impl SpeechEngine for WhisperEngine {
    fn load(&self, model_path: &Path) -> Result<Box<dyn EngineContext>, EngineError> {
        let load_error = |reason: String| EngineError::Load {
            path: model_path.to_path_buf(),
            reason,
        };
        let path = model_path
            .to_str()
            .ok_or_else(|| load_error("path is not valid UTF-8".to_string()))?;

        let mut params = WhisperContextParameters::default();
        params.use_gpu = self.use_gpu;
        let context = WhisperContext::new_with_params(path, params)
            .map_err(|e| load_error(format!("failed to load Whisper model: {e}")))?;
        let state = context
            .create_state()
            .map_err(|e| load_error(format!("failed to create Whisper state: {e}")))?;

        Ok(Box::new(WhisperEngineContext {
            _context: context,
            state,
        }))
    }
}

/// A loaded whisper model and the state its inference passes run on.
pub struct WhisperEngineContext {
    _context: WhisperContext,
    state: WhisperState,
}

impl EngineContext for WhisperEngineContext {
    fn infer(&mut self, params: &InferenceParams, samples: &[f32]) -> Result<(), EngineError> {
        let mut full = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        full.set_print_special(false);
        full.set_print_progress(params.print_progress);
        full.set_print_realtime(params.print_realtime);
        full.set_print_timestamps(params.print_timestamps);
        full.set_translate(params.translate);
        full.set_no_context(params.no_context);
        full.set_single_segment(params.single_segment);
        full.set_audio_ctx(params.audio_ctx);
        full.set_n_threads(params.threads as i32);

        // whisper.cpp's own `detect_language` flag stops after detection without
        // transcribing, so detection is requested through the "auto" language.
        full.set_detect_language(false);
        match &params.language {
            LanguageSelection::Fixed { code, .. } => full.set_language(Some(code.as_str())),
            LanguageSelection::Detect => full.set_language(Some(AUTO_LANGUAGE)),
        }

        let status = self
            .state
            .full(full, samples)
            .map_err(|e| EngineError::Inference(e.to_string()))?;
        if status != 0 {
            return Err(EngineError::Inference(format!("whisper_full returned {status}")));
        }
        Ok(())
    }

    fn segment_count(&self) -> usize {
        self.state.full_n_segments().max(0) as usize
    }

    fn segment_text(&self, index: usize) -> Option<Vec<u8>> {
        let segment = self.state.get_segment(index as i32)?;
        segment.to_bytes().ok().map(<[u8]>::to_vec)
    }

    fn language_id(&self, code: &str) -> Option<LanguageId> {
        lookup_language_id(code)
    }

    fn language_code(&self, id: LanguageId) -> Option<String> {
        whisper_rs::get_lang_str(id).map(str::to_string)
    }

    fn max_language_id(&self) -> LanguageId {
        whisper_rs::get_lang_max_id()
    }

    fn detect_language(&mut self, samples: &[f32], threads: usize) -> Option<LanguageId> {
        self.state.pcm_to_mel(samples, threads).ok()?;
        let (id, _probabilities) = self.state.lang_detect(0, threads).ok()?;
        Some(id)
    }
}

/// whisper-rs panics on interior NULs, so such codes never resolve.
fn lookup_language_id(code: &str) -> Option<LanguageId> {
    if code.contains('\0') {
        return None;
    }
    whisper_rs::get_lang_id(code)
}
