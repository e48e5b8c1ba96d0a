use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::encoding::result_payload::{PayloadError, ResultPayload};

use super::inference_session::InferenceRequest;
use super::session_registry::{SessionHandle, SessionRegistry};

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("failed to initialise speech context for {}", .0.display())]
    InitFailed(PathBuf),
    #[error("native bridge error: {0}")]
    Native(String),
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// What the host wants transcribed and with which model.
#[derive(Clone, Debug)]
pub struct TranscriptionRequest {
    pub model_path: PathBuf,
    pub sample_rate: u32,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub translate: bool,
    pub thread_count: i32,
}

/// Typed transcription as seen by the host application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transcription {
    pub transcript: String,
    pub translation: Option<String>,
    pub detected_language: Option<String>,
}

/// Keeps one live session per model path and turns payloads into
/// [`Transcription`]s.
pub struct SessionPool {
    registry: Arc<SessionRegistry>,
    handles: Mutex<HashMap<PathBuf, SessionHandle>>,
}

impl SessionPool {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self {
            registry,
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Returns the pooled handle for `model_path`, loading it on first use.
    ///
    /// The pool lock is held while loading so concurrent callers never load the
    /// same model twice.
    pub fn ensure_handle(&self, model_path: &Path, threads: i32) -> Result<SessionHandle, PoolError> {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = handles.get(model_path) {
            return Ok(*handle);
        }
        let handle = self
            .registry
            .init(&model_path.to_string_lossy(), threads);
        if handle.is_null() {
            return Err(PoolError::InitFailed(model_path.to_path_buf()));
        }
        handles.insert(model_path.to_path_buf(), handle);
        Ok(handle)
    }

    pub fn transcribe(
        &self,
        audio: Vec<u8>,
        request: &TranscriptionRequest,
    ) -> Result<Transcription, PoolError> {
        let handle = self.ensure_handle(&request.model_path, request.thread_count)?;
        let inference = InferenceRequest {
            audio,
            sample_rate: request.sample_rate,
            source_language: request.source_language.clone(),
            target_language: request.target_language.clone(),
            translate: request.translate,
            thread_override: request.thread_count,
        };
        let payload = self.registry.process(handle, &inference);
        Self::interpret(&payload, request.translate)
    }

    /// Converts a raw payload, treating blank fields as absent.
    pub fn interpret(payload: &str, translate: bool) -> Result<Transcription, PoolError> {
        match ResultPayload::parse(payload)? {
            ResultPayload::Failure { error } => Err(PoolError::Native(error)),
            ResultPayload::Success {
                transcript,
                translation,
                language,
            } => {
                let translation = if !translation.trim().is_empty() {
                    Some(translation)
                } else if translate {
                    Some(transcript.clone())
                } else {
                    None
                };
                let detected_language = Some(language).filter(|code| !code.trim().is_empty());
                Ok(Transcription {
                    transcript,
                    translation,
                    detected_language,
                })
            }
        }
    }

    /// Releases every pooled session.
    pub fn clear(&self) {
        let drained: Vec<SessionHandle> = {
            let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            handles.drain().map(|(_, handle)| handle).collect()
        };
        for handle in drained {
            self.registry.release(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
