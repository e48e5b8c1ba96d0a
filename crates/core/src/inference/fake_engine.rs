//! Scriptable in-memory engine for exercising sessions without a model file.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::inference::domain::inference_params::InferenceParams;
use crate::inference::domain::speech_engine::{EngineContext, LanguageId, SpeechEngine};
use crate::shared::errors::EngineError;

const LANGUAGES: &[&str] = &["en", "fr", "de", "es", "ja"];

/// What the fakes observed, shared between an engine and every context it loads.
#[derive(Debug, Default)]
pub struct Probe {
    pub loads: usize,
    pub dropped: usize,
    pub infer_calls: usize,
    pub last_params: Option<InferenceParams>,
    pub last_sample_count: Option<usize>,
    pub detect_calls: Vec<(usize, usize)>,
    pub in_flight: usize,
    pub max_in_flight: usize,
}

pub type SharedProbe = Arc<Mutex<Probe>>;

/// Canned behavior for a fake context.
#[derive(Clone, Debug)]
pub struct Script {
    pub segments: Vec<Vec<u8>>,
    pub fail_inference: bool,
    pub detected: Option<LanguageId>,
    /// How long each `infer` stays in flight.
    pub infer_delay: Option<Duration>,
}

impl Script {
    pub fn segments(segments: &[&str]) -> Vec<Vec<u8>> {
        segments.iter().map(|s| s.as_bytes().to_vec()).collect()
    }
}

impl Default for Script {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            fail_inference: false,
            detected: Some(0),
            infer_delay: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeContext {
    script: Script,
    produced: usize,
    probe: SharedProbe,
}

impl FakeContext {
    pub fn with_segments(mut self, segments: &[&str]) -> Self {
        self.script.segments = Script::segments(segments);
        self
    }

    pub fn with_segment_bytes(mut self, segments: &[&[u8]]) -> Self {
        self.script.segments = segments.iter().map(|s| s.to_vec()).collect();
        self
    }

    pub fn with_detected(mut self, detected: Option<LanguageId>) -> Self {
        self.script.detected = detected;
        self
    }

    pub fn failing(mut self) -> Self {
        self.script.fail_inference = true;
        self
    }

    pub fn probe(&self) -> SharedProbe {
        self.probe.clone()
    }

    pub fn detect_calls(&self) -> Vec<(usize, usize)> {
        self.probe.lock().unwrap().detect_calls.clone()
    }
}

impl EngineContext for FakeContext {
    fn infer(&mut self, params: &InferenceParams, samples: &[f32]) -> Result<(), EngineError> {
        {
            let mut probe = self.probe.lock().unwrap();
            probe.infer_calls += 1;
            probe.last_params = Some(params.clone());
            probe.last_sample_count = Some(samples.len());
            probe.in_flight += 1;
            probe.max_in_flight = probe.max_in_flight.max(probe.in_flight);
        }
        if let Some(delay) = self.script.infer_delay {
            thread::sleep(delay);
        }
        self.probe.lock().unwrap().in_flight -= 1;
        if self.script.fail_inference {
            self.produced = 0;
            return Err(EngineError::Inference("status -1".to_string()));
        }
        self.produced = self.script.segments.len();
        Ok(())
    }

    fn segment_count(&self) -> usize {
        self.produced
    }

    fn segment_text(&self, index: usize) -> Option<Vec<u8>> {
        self.script.segments.get(index).cloned()
    }

    fn language_id(&self, code: &str) -> Option<LanguageId> {
        LANGUAGES
            .iter()
            .position(|lang| *lang == code)
            .map(|id| id as LanguageId)
    }

    fn language_code(&self, id: LanguageId) -> Option<String> {
        usize::try_from(id)
            .ok()
            .and_then(|id| LANGUAGES.get(id))
            .map(|code| code.to_string())
    }

    fn max_language_id(&self) -> LanguageId {
        LANGUAGES.len() as LanguageId - 1
    }

    fn detect_language(&mut self, samples: &[f32], threads: usize) -> Option<LanguageId> {
        self.probe
            .lock()
            .unwrap()
            .detect_calls
            .push((samples.len(), threads));
        self.script.detected
    }
}

impl Drop for FakeContext {
    fn drop(&mut self) {
        if let Ok(mut probe) = self.probe.lock() {
            probe.dropped += 1;
        }
    }
}

/// Engine that hands out fresh contexts following one script.
///
/// Paths containing `reject` are refused, mimicking a corrupt model.
#[derive(Debug, Default)]
pub struct FakeEngine {
    script: Script,
    probe: SharedProbe,
}

impl FakeEngine {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            probe: SharedProbe::default(),
        }
    }

    pub fn with_segments(segments: &[&str]) -> Self {
        Self::new(Script {
            segments: Script::segments(segments),
            ..Script::default()
        })
    }

    pub fn probe(&self) -> SharedProbe {
        self.probe.clone()
    }
}

impl SpeechEngine for FakeEngine {
    fn load(&self, model_path: &Path) -> Result<Box<dyn EngineContext>, EngineError> {
        if model_path.to_string_lossy().contains("reject") {
            return Err(EngineError::Load {
                path: model_path.to_path_buf(),
                reason: "invalid model header".to_string(),
            });
        }
        self.probe.lock().unwrap().loads += 1;
        Ok(Box::new(FakeContext {
            script: self.script.clone(),
            produced: 0,
            probe: self.probe.clone(),
        }))
    }
}
