//! The conversation controller.
//!
//! Owns all widget state: the transcript, the input buffer, the typing /
//! listening / muted / speaking flags, and the theme. State is mutated
//! only by local UI events and by request completions; nothing is ever
//! persisted and no failure is fatal.
//!
//! `submit` is split in two so an event-loop UI can run the network call
//! in a background task: `begin_submit` validates and flags, the request
//! runs elsewhere, and `complete_submit` applies the outcome. The async
//! `submit` composes both for headless use.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::client::{ChatBackend, ClientError};
use crate::conversation::{Conversation, Message};
use crate::speech::{
    ListenState, RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
};

/// Reply shown (and spoken) whenever a request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Delay after the last speech result before the transcript auto-submits.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light palette (default).
    #[default]
    Light,
    /// Dark palette.
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Conversational state machine for the booking-assistant widget.
pub struct ConversationController {
    backend: Arc<dyn ChatBackend>,
    conversation: Conversation,
    input: String,
    typing: bool,
    listen_state: ListenState,
    muted: bool,
    speaking: bool,
    theme: Theme,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    debounce: Duration,
    pending_transcript: Option<String>,
    debounce_deadline: Option<Instant>,
}

impl ConversationController {
    /// Create a controller over the given backend, seeded with the
    /// default greeting. Speech capabilities start absent; mute starts on.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            conversation: Conversation::new(),
            input: String::new(),
            typing: false,
            listen_state: ListenState::Idle,
            muted: true,
            speaking: false,
            theme: Theme::default(),
            recognizer: None,
            synthesizer: None,
            debounce: DEFAULT_DEBOUNCE,
            pending_transcript: None,
            debounce_deadline: None,
        }
    }

    /// Seed the conversation with a specific greeting instead.
    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.conversation = Conversation::with_greeting(greeting);
        self
    }

    /// Attach a speech-recognition capability.
    #[must_use]
    pub fn with_recognizer(mut self, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Attach a speech-synthesis capability.
    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Box<dyn SpeechSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Set the initial theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the initial mute state.
    #[must_use]
    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Override the auto-submit debounce window.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    // === Accessors ===

    /// The transcript, in append order.
    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// Current input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer (keyboard editing happens in the view;
    /// the buffer is kept in sync here).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a request is in flight.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Current capture state.
    pub fn listen_state(&self) -> ListenState {
        self.listen_state
    }

    /// Whether speech capture is active.
    pub fn is_listening(&self) -> bool {
        self.listen_state == ListenState::Listening
    }

    /// Whether speech playback is muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether an utterance is currently playing.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the speech-input capability is present (mic control shown).
    pub fn has_recognizer(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Whether the speech-output capability is present.
    pub fn has_synthesizer(&self) -> bool {
        self.synthesizer.is_some()
    }

    /// Handle to the backend, for running requests in a background task.
    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }

    // === Submit ===

    /// Start a submission: validate, append the user message, clear the
    /// input buffer, and set the typing flag.
    ///
    /// Returns the full history to send, or `None` when `text` is blank
    /// after trimming (in which case no state changes at all).
    pub fn begin_submit(&mut self, text: &str) -> Option<Vec<Message>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.conversation.push(Message::user(trimmed));
        self.input.clear();
        self.typing = true;
        Some(self.conversation.messages().to_vec())
    }

    /// Finish a submission: append the reply (or the fallback on any
    /// failure), clear the typing flag, and trigger playback. The typing
    /// flag is cleared on every path.
    pub fn complete_submit(&mut self, outcome: Result<String, ClientError>) -> String {
        let reply = match outcome {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("chat request failed: {e}");
                FALLBACK_REPLY.to_string()
            }
        };

        self.conversation.push(Message::bot(reply.clone()));
        self.typing = false;
        self.speak(&reply);
        reply
    }

    /// Submit in one step over the owned backend. No retries, no timeout.
    pub async fn submit(&mut self, text: &str) {
        let Some(history) = self.begin_submit(text) else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let outcome = backend.send(&history).await;
        self.complete_submit(outcome);
    }

    // === Speech capture ===

    /// Start or stop continuous speech capture. No-op when the capability
    /// is absent. A failed start is logged and leaves the state `Idle`.
    pub fn toggle_listening(&mut self) {
        let Some(recognizer) = self.recognizer.as_mut() else {
            return;
        };

        match self.listen_state {
            ListenState::Idle => match recognizer.start() {
                Ok(()) => self.transition(ListenState::Listening),
                Err(e) => tracing::warn!("speech capture failed to start: {e}"),
            },
            ListenState::Listening => {
                recognizer.stop();
                self.transition(ListenState::Idle);
                self.clear_debounce();
            }
        }
    }

    /// Apply a recognition event at time `now`.
    ///
    /// Every transcript update replaces the input buffer and restarts the
    /// debounce window; only a non-empty finalized transcript arms it, and
    /// the latest finalized transcript wins.
    pub fn handle_recognition(&mut self, event: RecognitionEvent, now: Instant) {
        match event {
            RecognitionEvent::Transcript { text, is_final } => {
                self.input = text.clone();
                if is_final && !text.trim().is_empty() {
                    self.pending_transcript = Some(text);
                }
                if self.pending_transcript.is_some() {
                    self.debounce_deadline = Some(now + self.debounce);
                }
            }
            RecognitionEvent::Ended => {
                // Restart only while capture is still intended.
                if self.listen_state == ListenState::Listening {
                    if let Some(recognizer) = self.recognizer.as_mut() {
                        if let Err(e) = recognizer.start() {
                            tracing::warn!("speech capture restart failed: {e}");
                            self.transition(ListenState::Idle);
                        }
                    }
                }
            }
            RecognitionEvent::Error(msg) => {
                tracing::warn!("speech recognition error: {msg}");
                if self.listen_state == ListenState::Listening {
                    if let Some(recognizer) = self.recognizer.as_mut() {
                        recognizer.stop();
                    }
                    self.transition(ListenState::Idle);
                }
            }
        }
    }

    /// Take the pending transcript if its debounce window has elapsed.
    /// The caller feeds the result into `begin_submit`.
    pub fn take_due_transcript(&mut self, now: Instant) -> Option<String> {
        let deadline = self.debounce_deadline?;
        if now < deadline {
            return None;
        }
        self.debounce_deadline = None;
        self.pending_transcript.take()
    }

    fn clear_debounce(&mut self) {
        self.pending_transcript = None;
        self.debounce_deadline = None;
    }

    fn transition(&mut self, target: ListenState) {
        if self.listen_state.can_transition_to(target) {
            tracing::debug!("capture state: {} -> {}", self.listen_state, target);
            self.listen_state = target;
        }
    }

    // === Playback and settings ===

    /// Queue playback of `text`. No-op when muted or the capability is
    /// absent; a queue failure is logged, never shown.
    pub fn speak(&mut self, text: &str) {
        if self.muted {
            return;
        }
        let Some(synthesizer) = self.synthesizer.as_mut() else {
            return;
        };
        if let Err(e) = synthesizer.speak(text) {
            tracing::warn!("speech playback unavailable: {e}");
        }
    }

    /// Apply a synthesis event, tracking the speaking flag.
    pub fn handle_synthesis(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Started => self.speaking = true,
            SynthesisEvent::Finished => self.speaking = false,
        }
    }

    /// Flip the mute switch.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Set the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Flip between light and dark.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}
