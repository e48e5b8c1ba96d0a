use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults read from a JSON file; command-line flags take precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model_path: Option<PathBuf>,
    pub threads: i32,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub translate: bool,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("SpeechBridge").join("settings.json"))
    }

    /// Loads `path`, or the default location when `None`. Missing or invalid
    /// files yield defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };
        path.and_then(|p| fs::read_to_string(&p).ok().map(|json| (p, json)))
            .and_then(|(p, json)| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("Ignoring invalid settings file {}: {e}", p.display());
                    None
                }
            })
            .unwrap_or_default()
    }
}
