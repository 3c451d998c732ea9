//! Speech capability discovery.
//!
//! Checks whether the configured helper commands exist on PATH. Absence
//! is not an error: the related control is hidden and everything else
//! keeps working.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Which capability a report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    /// Speech-to-text input.
    Recognizer,
    /// Text-to-speech output.
    Synthesizer,
}

/// Discovery report for one capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityInfo {
    /// Which capability this describes.
    pub kind: CapabilityKind,

    /// Whether an argv is configured at all.
    pub configured: bool,

    /// Whether the helper binary was found on PATH.
    pub found: bool,

    /// Path to the binary, if found.
    pub path: Option<String>,

    /// Any issues detected.
    pub issues: Vec<String>,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Recognizer => write!(f, "recognizer"),
            Self::Synthesizer => write!(f, "synthesizer"),
        }
    }
}

impl CapabilityInfo {
    /// Whether the capability can actually be used.
    pub fn available(&self) -> bool {
        self.configured && self.found
    }
}

/// Result of discovering both capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// Report for the recognizer capability.
    pub recognizer: CapabilityInfo,
    /// Report for the synthesizer capability.
    pub synthesizer: CapabilityInfo,
}

/// Discover the speech capabilities named by `config`.
pub fn discover_capabilities(config: &Config) -> DiscoveryResult {
    DiscoveryResult {
        recognizer: discover_capability(CapabilityKind::Recognizer, &config.recognizer_argv),
        synthesizer: discover_capability(CapabilityKind::Synthesizer, &config.synthesizer_argv),
    }
}

fn discover_capability(kind: CapabilityKind, argv: &[String]) -> CapabilityInfo {
    let mut info = CapabilityInfo {
        kind,
        configured: false,
        found: false,
        path: None,
        issues: Vec::new(),
    };

    let Some(program) = argv.first() else {
        return info;
    };
    info.configured = true;

    match which::which(program) {
        Ok(path) => {
            info.found = true;
            info.path = Some(path.display().to_string());
        }
        Err(_) => {
            info.issues.push(format!("{program} not found on PATH"));
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_capability_is_absent_not_broken() {
        let result = discover_capabilities(&Config::default());
        assert!(!result.recognizer.configured);
        assert!(!result.recognizer.available());
        assert!(result.recognizer.issues.is_empty());
        assert!(!result.synthesizer.available());
    }

    #[test]
    fn test_configured_but_missing_binary() {
        let mut config = Config::default();
        config.recognizer_argv = vec!["definitely-not-a-real-helper".into()];

        let result = discover_capabilities(&config);
        assert!(result.recognizer.configured);
        assert!(!result.recognizer.found);
        assert!(!result.recognizer.available());
        assert_eq!(result.recognizer.issues.len(), 1);
    }

    #[test]
    fn test_common_binary_is_found() {
        // `sh` exists on any platform the test suite runs on.
        let mut config = Config::default();
        config.synthesizer_argv = vec!["sh".into()];

        let result = discover_capabilities(&config);
        assert!(result.synthesizer.available());
        assert!(result.synthesizer.path.is_some());
    }

    #[test]
    fn test_discovery_result_serializes() {
        let result = discover_capabilities(&Config::default());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("recognizer"));
        assert!(json.contains("synthesizer"));
    }
}
