use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("malformed bridge payload: {0}")]
pub struct PayloadError(#[from] serde_json::Error);

/// Host-side view of a payload produced by the result encoder.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    Failure {
        error: String,
    },
    Success {
        #[serde(default)]
        transcript: String,
        #[serde(default)]
        translation: String,
        #[serde(default)]
        language: String,
    },
}

impl ResultPayload {
    pub fn parse(payload: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            ResultPayload::Failure { error } => Some(error.as_str()),
            ResultPayload::Success { .. } => None,
        }
    }
}
