//! Terminal event stream for the concierge TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Input and timer events delivered to the run loop.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),
    /// Mouse input (wheel scrolling).
    Mouse(MouseEvent),
    /// Nothing arrived within one poll interval. Paces the typing
    /// animation and speech channel draining.
    Tick,
    /// Terminal was resized.
    Resize(u16, u16),
}

/// Bridges crossterm's blocking event source into an async channel.
///
/// Crossterm reads are blocking, so a dedicated thread polls the
/// terminal and forwards everything over an unbounded channel. The
/// thread exits once the receiving side is dropped.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Spawn the polling thread with the given tick interval.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            loop {
                let ready = event::poll(tick_rate).unwrap_or(false);
                let event = if ready {
                    match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                        Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                        Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                        // Focus/paste events carry nothing we act on
                        _ => continue,
                    }
                } else {
                    Event::Tick
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Wait for the next event. Returns `None` once the polling thread
    /// has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Key action that can be performed in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleSettings,
    ToggleMic,
    ToggleTheme,
    Back,
    Select,
    Up,
    Down,
    ScrollUp,
    ScrollDown,
    None,
}

/// Convert a key event to an action.
///
/// Plain characters never map to actions here; they belong to the text
/// input. Only control chords and navigation keys carry meaning.
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('s') => Action::ToggleSettings,
            KeyCode::Char('l') => Action::ToggleMic,
            KeyCode::Char('t') => Action::ToggleTheme,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => Action::Select,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_chords() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Action::ToggleSettings
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('l'), KeyModifiers::CONTROL)),
            Action::ToggleMic
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('t'), KeyModifiers::CONTROL)),
            Action::ToggleTheme
        );
    }

    #[test]
    fn test_plain_characters_are_not_actions() {
        assert_eq!(
            key_to_action(key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Action::None
        );
        assert_eq!(
            key_to_action(key(KeyCode::Char('s'), KeyModifiers::NONE)),
            Action::None
        );
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_to_action(key(KeyCode::Esc, KeyModifiers::NONE)), Action::Back);
        assert_eq!(
            key_to_action(key(KeyCode::Enter, KeyModifiers::NONE)),
            Action::Select
        );
        assert_eq!(
            key_to_action(key(KeyCode::PageUp, KeyModifiers::NONE)),
            Action::ScrollUp
        );
        assert_eq!(
            key_to_action(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Action::ScrollDown
        );
    }
}
