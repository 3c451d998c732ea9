//! Widgets for the concierge TUI.

pub mod settings;
pub mod status_bar;
pub mod text_input;
pub mod transcript;

pub use settings::{SettingsPanel, SettingsState};
pub use status_bar::{KeyHint, StatusBar, VoiceStatus};
pub use text_input::{TextInput, TextInputState};
pub use transcript::{Transcript, TranscriptScroll};
