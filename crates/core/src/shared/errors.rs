use std::path::PathBuf;

use thiserror::Error;

use super::constants::{ERROR_CONTEXT_NOT_INITIALIZED, ERROR_EMPTY_AUDIO, ERROR_INFERENCE_FAILED};

/// Failures reported by a speech engine implementation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to load model from {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Reasons a session could not be created.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("model path is empty")]
    EmptyModelPath,
    #[error("model not found at: {}", .0.display())]
    ModelNotFound(PathBuf),
    #[error("engine rejected model: {0}")]
    Engine(#[from] EngineError),
}

/// Request failures surfaced to the caller as an error payload.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    #[error("session context is not initialized")]
    ContextNotInitialized,
    #[error("audio buffer is empty")]
    EmptyAudio,
    #[error("engine inference failed")]
    InferenceFailed,
}

impl BridgeError {
    /// Stable wire code carried in the `error` field of the payload.
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::ContextNotInitialized => ERROR_CONTEXT_NOT_INITIALIZED,
            BridgeError::EmptyAudio => ERROR_EMPTY_AUDIO,
            BridgeError::InferenceFailed => ERROR_INFERENCE_FAILED,
        }
    }
}
