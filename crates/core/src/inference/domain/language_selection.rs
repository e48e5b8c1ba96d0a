use super::speech_engine::{EngineContext, LanguageId};

/// How the spoken language is chosen for one inference pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LanguageSelection {
    /// The caller named a language the engine recognizes.
    Fixed { code: String, id: LanguageId },
    /// Let the engine figure it out.
    Detect,
}

impl LanguageSelection {
    /// Fixes the language when `source` is non-empty and known to the engine;
    /// anything else falls back to detection.
    pub fn resolve(source: Option<&str>, context: &dyn EngineContext) -> Self {
        match source.filter(|code| !code.is_empty()) {
            Some(code) => match context.language_id(code) {
                Some(id) if id >= 0 => LanguageSelection::Fixed {
                    code: code.to_string(),
                    id,
                },
                _ => LanguageSelection::Detect,
            },
            None => LanguageSelection::Detect,
        }
    }

    pub fn detects(&self) -> bool {
        matches!(self, LanguageSelection::Detect)
    }

    /// Language code to report once inference has succeeded.
    ///
    /// Detection runs over the already-decoded samples with the request's
    /// thread count. Ids outside the engine's range count as unresolved and
    /// yield an empty code.
    pub fn reported_code(
        &self,
        context: &mut dyn EngineContext,
        samples: &[f32],
        threads: usize,
    ) -> String {
        let id = match self {
            LanguageSelection::Fixed { id, .. } => Some(*id),
            LanguageSelection::Detect => context.detect_language(samples, threads),
        };
        id.filter(|id| (0..=context.max_language_id()).contains(id))
            .and_then(|id| context.language_code(id))
            .or_else(|| match self {
                LanguageSelection::Fixed { code, .. } => Some(code.clone()),
                LanguageSelection::Detect => None,
            })
            .unwrap_or_default()
    }
}
