use crate::shared::constants::FULL_AUDIO_CONTEXT;

use super::language_selection::LanguageSelection;

/// Decoding configuration for a single inference pass.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceParams {
    pub threads: usize,
    pub translate: bool,
    pub language: LanguageSelection,
    /// Do not carry decoder text over from previous passes.
    pub no_context: bool,
    pub single_segment: bool,
    /// Audio context window; 0 selects the model's full window.
    pub audio_ctx: i32,
    pub print_progress: bool,
    pub print_realtime: bool,
    pub print_timestamps: bool,
}

impl InferenceParams {
    /// Greedy, quiet, context-free configuration used for every bridge request.
    pub fn for_request(threads: usize, translate: bool, language: LanguageSelection) -> Self {
        Self {
            threads,
            translate,
            language,
            no_context: true,
            single_segment: false,
            audio_ctx: FULL_AUDIO_CONTEXT,
            print_progress: false,
            print_realtime: false,
            print_timestamps: false,
        }
    }

    pub fn detect_language(&self) -> bool {
        self.language.detects()
    }
}
