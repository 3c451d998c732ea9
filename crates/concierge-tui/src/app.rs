//! Application state and update logic for the concierge TUI.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use concierge_engine::{
    discover_capabilities, CommandRecognizer, CommandSynthesizer, Config, ConversationController,
    HttpChatClient, RecognitionEvent, SynthesisEvent,
};

use crate::event::{key_to_action, Action};
use crate::ui::widgets::{SettingsState, TextInputState, TranscriptScroll};

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 3;

/// Application state.
pub struct App {
    /// Conversation state machine shared with the engine.
    pub controller: ConversationController,

    /// Text input state for the composer.
    pub input: TextInputState,

    /// Transcript scroll state.
    pub scroll: TranscriptScroll,

    /// Whether the settings overlay is visible.
    pub show_settings: bool,

    /// Settings overlay cursor.
    pub settings: SettingsState,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Tick counter for animations.
    pub tick: usize,

    /// Recognition events from the speech helper, drained on tick.
    pub recognition_rx: Option<mpsc::UnboundedReceiver<RecognitionEvent>>,

    /// Synthesis events from the speech helper, drained on tick.
    pub synthesis_rx: Option<mpsc::UnboundedReceiver<SynthesisEvent>>,

    /// Text the user asked to send this frame, consumed by the run loop.
    pending_submit: Option<String>,
}

impl App {
    /// Build the application from configuration.
    ///
    /// Speech capabilities are attached only when their helper commands are
    /// configured and resolvable on `PATH`.
    pub fn new(config: &Config) -> Self {
        let backend = Arc::new(HttpChatClient::new(&config.endpoint));
        let mut controller = ConversationController::new(backend)
            .with_greeting(&config.greeting)
            .with_theme(config.theme)
            .with_muted(config.muted)
            .with_debounce(std::time::Duration::from_millis(config.debounce_ms));

        let capabilities = discover_capabilities(config);

        let mut recognition_rx = None;
        if capabilities.recognizer.available() {
            if let Some(argv) = config.recognizer_command() {
                let (tx, rx) = mpsc::unbounded_channel();
                controller = controller.with_recognizer(Box::new(CommandRecognizer::new(argv, tx)));
                recognition_rx = Some(rx);
            }
        }

        let mut synthesis_rx = None;
        if capabilities.synthesizer.available() {
            if let Some(argv) = config.synthesizer_command() {
                let (tx, rx) = mpsc::unbounded_channel();
                controller =
                    controller.with_synthesizer(Box::new(CommandSynthesizer::new(argv, tx)));
                synthesis_rx = Some(rx);
            }
        }

        Self {
            controller,
            input: TextInputState::new(),
            scroll: TranscriptScroll::default(),
            show_settings: false,
            settings: SettingsState::default(),
            should_quit: false,
            tick: 0,
            recognition_rx,
            synthesis_rx,
            pending_submit: None,
        }
    }

    /// Build the application around an existing controller.
    ///
    /// Used by tests to inject a fake backend.
    pub fn with_controller(controller: ConversationController) -> Self {
        Self {
            controller,
            input: TextInputState::new(),
            scroll: TranscriptScroll::default(),
            show_settings: false,
            settings: SettingsState::default(),
            should_quit: false,
            tick: 0,
            recognition_rx: None,
            synthesis_rx: None,
            pending_submit: None,
        }
    }

    /// Take the text the user submitted this frame, if any.
    pub fn take_pending_submit(&mut self) -> Option<String> {
        self.pending_submit.take()
    }

    /// Queue text for submission through the run loop.
    pub fn request_submit(&mut self, text: String) {
        if !text.trim().is_empty() {
            self.pending_submit = Some(text);
        }
    }

    /// Advance the animation tick.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle a key event, routing to the settings overlay when open.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_settings {
            self.handle_settings_key(key);
            return;
        }

        match key_to_action(key) {
            Action::Quit => self.should_quit = true,
            Action::ToggleSettings => {
                self.show_settings = true;
                self.settings = SettingsState::default();
            }
            Action::ToggleMic => self.controller.toggle_listening(),
            Action::ToggleTheme => self.controller.toggle_theme(),
            Action::Back => self.should_quit = true,
            Action::Select => {
                let text = self.input.submit();
                self.request_submit(text);
            }
            Action::Up => {
                self.input.history_prev();
            }
            Action::Down => {
                self.input.history_next();
            }
            Action::ScrollUp => self.scroll.scroll_up(SCROLL_STEP),
            Action::ScrollDown => self.scroll.scroll_down(SCROLL_STEP),
            Action::None => self.handle_text_key(key),
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key_to_action(key) {
            Action::Quit => self.should_quit = true,
            Action::Back | Action::ToggleSettings => self.show_settings = false,
            Action::Up => self.settings.up(),
            Action::Down => self.settings.down(),
            Action::Select => match self.settings.cursor {
                0 => self.controller.toggle_theme(),
                _ => self.controller.toggle_mute(),
            },
            _ => {}
        }
    }

    /// Route plain typing into the composer.
    fn handle_text_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.input.move_home(),
                KeyCode::Char('e') => self.input.move_end(),
                KeyCode::Char('u') => self.input.clear(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(ch) => self.input.insert(ch),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use concierge_engine::{ChatBackend, ClientError, Message};

    struct FakeBackend;

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn send(&self, _messages: &[Message]) -> Result<String, ClientError> {
            Ok("ack".to_string())
        }
    }

    fn test_app() -> App {
        App::with_controller(ConversationController::new(Arc::new(FakeBackend)))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_fills_composer() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.input.content(), "hi");
    }

    #[test]
    fn test_enter_queues_submission_and_clears_composer() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::Enter));

        assert!(app.input.is_empty());
        assert_eq!(app.take_pending_submit().as_deref(), Some("hi"));
        assert!(app.take_pending_submit().is_none());
    }

    #[test]
    fn test_enter_on_blank_composer_queues_nothing() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.take_pending_submit().is_none());
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = test_app();
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_quits_from_chat_but_closes_settings() {
        let mut app = test_app();
        app.handle_key(ctrl('s'));
        assert!(app.show_settings);

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_settings);
        assert!(!app.should_quit);

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_settings_enter_toggles_selected_row() {
        let mut app = test_app();
        let initial_theme = app.controller.theme();
        let initial_muted = app.controller.is_muted();

        app.handle_key(ctrl('s'));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller.theme(), initial_theme.toggled());

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller.is_muted(), !initial_muted);
    }

    #[test]
    fn test_ctrl_t_toggles_theme_in_chat() {
        let mut app = test_app();
        let initial = app.controller.theme();
        app.handle_key(ctrl('t'));
        assert_eq!(app.controller.theme(), initial.toggled());
    }

    #[test]
    fn test_mic_toggle_without_recognizer_is_noop() {
        let mut app = test_app();
        app.handle_key(ctrl('l'));
        assert!(!app.controller.is_listening());
    }

    #[test]
    fn test_page_keys_scroll_transcript() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll.from_bottom, SCROLL_STEP);

        app.handle_key(key(KeyCode::PageDown));
        assert!(app.scroll.is_following());
    }

    #[test]
    fn test_up_recalls_history() {
        let mut app = test_app();
        app.handle_key(key(KeyCode::Char('a')));
        app.handle_key(key(KeyCode::Enter));
        let _ = app.take_pending_submit();

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.input.content(), "a");
    }
}
