use directories::BaseDirs;
use std::path::PathBuf;

/// Application config directory (OS standard)
/// Linux: ~/.config/WordsCounter
/// macOS: ~/Library/Application Support/WordsCounter
/// Windows: %APPDATA%\\WordsCounter
pub fn app_config_dir() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.config_dir().join("WordsCounter");
    }
    // Fallback: current working directory
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
