//! concierge-engine: Headless conversation engine for the booking assistant
//!
//! This crate provides everything behind the widget surface, including:
//! - The append-only conversation transcript
//! - The conversation controller (submit, speech capture, settings)
//! - The HTTP chat client
//! - Speech capability traits, helpers, and discovery
//! - Configuration management

pub mod client;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod discovery;
pub mod speech;

// Re-export commonly used types
pub use client::{ChatBackend, ClientError, HttpChatClient};
pub use config::{Config, ConfigError};
pub use controller::{ConversationController, Theme, DEFAULT_DEBOUNCE, FALLBACK_REPLY};
pub use conversation::{Conversation, Message, Sender, GREETING};
pub use discovery::{discover_capabilities, CapabilityInfo, CapabilityKind, DiscoveryResult};
pub use speech::{
    CommandRecognizer, CommandSynthesizer, ListenState, RecognitionEvent, SpeechError,
    SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
