use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

use crate::transcription::model::DEFAULT_MODEL_FILENAME;
use crate::utils::app_config_dir;

/// Last-used form values, restored on the next launch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub model_filename: String,
    /// Whisper language hint; "auto" means auto-detect.
    pub language: String,
    pub target_words: String,
    pub fuzzy_threshold: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_filename: DEFAULT_MODEL_FILENAME.to_string(),
            language: "auto".to_string(),
            target_words: String::new(),
            fuzzy_threshold: String::new(),
        }
    }
}

pub fn config_path() -> PathBuf {
    app_config_dir().join("settings.toml")
}

/// Load settings from the OS config dir; missing or corrupt files fall back
/// to defaults.
pub fn load_config() -> AppConfig {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(s) => toml::from_str(&s).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

pub fn save_config(config: &AppConfig) {
    if let Ok(config_str) = toml::to_string(config) {
        let config_path = config_path();

        // Create settings directory if missing
        if let Some(parent) = config_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        // Atomic-ish write: write to temp file then rename
        let tmp_path = config_path.with_extension("toml.tmp");
        if let Ok(mut f) = std::fs::File::create(&tmp_path) {
            let _ = f.write_all(config_str.as_bytes());
            let _ = f.flush();
            let _ = std::fs::rename(tmp_path, config_path);
        }
    }
}
