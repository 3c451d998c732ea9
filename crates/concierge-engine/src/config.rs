//! Configuration for the concierge widget.
//!
//! Stored as JSON under `.concierge/config.json`. Every field has a
//! default so a partial (or absent) file still yields a working setup.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::controller::Theme;
use crate::conversation::GREETING;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat endpoint (the `/chat` path is appended).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Greeting seeded into every new conversation.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Initial theme.
    #[serde(default)]
    pub theme: Theme,

    /// Whether speech playback starts muted.
    #[serde(default = "default_muted")]
    pub muted: bool,

    /// Debounce window for speech auto-submit, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Speech locale requested from the recognizer helper.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Command and arguments for the speech-recognition helper.
    /// Empty means the capability is absent and the mic control is hidden.
    #[serde(default)]
    pub recognizer_argv: Vec<String>,

    /// Command and arguments for the speech-synthesis helper.
    /// Empty means replies are never spoken.
    #[serde(default)]
    pub synthesizer_argv: Vec<String>,
}

fn default_endpoint() -> String {
    "http://localhost:5000".into()
}

fn default_greeting() -> String {
    GREETING.into()
}

fn default_muted() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_locale() -> String {
    "en-US".into()
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Recognizer argv with the locale flag appended, or `None` when the
    /// capability is not configured.
    pub fn recognizer_command(&self) -> Option<Vec<String>> {
        if self.recognizer_argv.is_empty() {
            return None;
        }
        let mut argv = self.recognizer_argv.clone();
        argv.push(format!("--lang={}", self.locale));
        Some(argv)
    }

    /// Synthesizer argv, or `None` when the capability is not configured.
    pub fn synthesizer_command(&self) -> Option<Vec<String>> {
        if self.synthesizer_argv.is_empty() {
            None
        } else {
            Some(self.synthesizer_argv.clone())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            greeting: default_greeting(),
            theme: Theme::default(),
            muted: default_muted(),
            debounce_ms: default_debounce_ms(),
            locale: default_locale(),
            recognizer_argv: Vec::new(),
            synthesizer_argv: Vec::new(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:5000");
        assert_eq!(config.greeting, GREETING);
        assert_eq!(config.theme, Theme::Light);
        assert!(config.muted);
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.locale, "en-US");
        assert!(config.recognizer_command().is_none());
        assert!(config.synthesizer_command().is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.endpoint, "http://localhost:5000");
        assert!(config.muted);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".concierge").join("config.json");

        let mut config = Config::default();
        config.endpoint = "http://example.test:8080".into();
        config.recognizer_argv = vec!["listen-helper".into()];
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.endpoint, "http://example.test:8080");
        assert_eq!(loaded.recognizer_argv, vec!["listen-helper".to_string()]);
    }

    #[test]
    fn test_recognizer_command_appends_locale() {
        let mut config = Config::default();
        config.recognizer_argv = vec!["listen-helper".into(), "--stream".into()];
        assert_eq!(
            config.recognizer_command().unwrap(),
            vec![
                "listen-helper".to_string(),
                "--stream".to_string(),
                "--lang=en-US".to_string(),
            ]
        );
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Config::load(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
