//! concierge-tui: Terminal UI for the booking concierge chat client.
//!
//! This crate provides the interactive layer on top of `concierge-engine`:
//! - Scrollable conversation transcript with a typing indicator
//! - Single-line composer with input history
//! - Settings overlay for theme and mute toggles
//! - Voice indicators wired to the engine's speech capabilities

pub mod app;
pub mod event;
pub mod ui;

pub use app::App;
pub use concierge_engine;
pub use event::{Action, Event, EventHandler};

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame, Terminal,
};
use std::io::{self, stdout};

use concierge_engine::{ClientError, Config, Message};
use ui::theme::Palette;
use ui::widgets::{KeyHint, SettingsPanel, StatusBar, TextInput, Transcript, VoiceStatus};

/// Lines moved per mouse wheel notch.
const WHEEL_STEP: usize = 3;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // 4 Hz tick rate drives the typing animation and speech polling
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

/// In-flight chat request.
type ChatHandle = tokio::task::JoinHandle<Result<String, ClientError>>;

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chat_handles: Vec<ChatHandle> = Vec::new();

    loop {
        terminal.draw(|frame| render_app(frame, app))?;

        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.scroll.scroll_up(WHEEL_STEP),
                    MouseEventKind::ScrollDown => app.scroll.scroll_down(WHEEL_STEP),
                    _ => {}
                },
                Event::Tick => {
                    app.on_tick();
                    pump_speech(app, &mut chat_handles);
                }
                Event::Resize(_, _) => {}
            }
        }

        // Typed submissions queued by the key handler
        if let Some(text) = app.take_pending_submit() {
            start_chat(app, &mut chat_handles, &text);
        }

        // Check for completed chat requests (non-blocking)
        let mut completed = Vec::new();
        for (i, handle) in chat_handles.iter().enumerate() {
            if handle.is_finished() {
                completed.push(i);
            }
        }
        for i in completed.into_iter().rev() {
            let outcome = match chat_handles.remove(i).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Interrupted),
            };
            app.controller.complete_submit(outcome);
            app.scroll.to_bottom();
        }

        if app.should_quit {
            for handle in chat_handles {
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Drain speech events and fire any transcript whose silence window elapsed.
fn pump_speech(app: &mut App, chat_handles: &mut Vec<ChatHandle>) {
    let now = tokio::time::Instant::now();

    if let Some(rx) = app.recognition_rx.as_mut() {
        while let Ok(event) = rx.try_recv() {
            app.controller.handle_recognition(event, now);
        }
    }
    if let Some(rx) = app.synthesis_rx.as_mut() {
        while let Ok(event) = rx.try_recv() {
            app.controller.handle_synthesis(event);
        }
    }

    // Mirror the live transcript into the composer while listening
    if app.controller.is_listening() {
        app.input.set_content(app.controller.input());
    }

    if let Some(text) = app.controller.take_due_transcript(now) {
        app.input.clear();
        start_chat(app, chat_handles, &text);
    }
}

/// Append the user message and spawn the request for its reply.
fn start_chat(app: &mut App, chat_handles: &mut Vec<ChatHandle>, text: &str) {
    if let Some(history) = app.controller.begin_submit(text) {
        tracing::debug!(messages = history.len(), "starting chat request");
        app.scroll.to_bottom();
        let backend = app.controller.backend();
        chat_handles.push(tokio::spawn(async move { backend.send(&history).await }));
    }
}

/// Render the full application frame.
fn render_app(frame: &mut Frame<'_>, app: &App) {
    let palette = Palette::for_theme(app.controller.theme());
    let area = frame.area();

    let [transcript_area, input_area, status_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let messages: &[Message] = app.controller.messages();
    let transcript = Transcript::new(messages, &palette)
        .scroll(app.scroll)
        .typing(app.controller.is_typing(), app.tick)
        .focused(!app.show_settings);
    frame.render_widget(transcript, transcript_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.show_settings {
            palette.border
        } else {
            palette.border_focused
        }))
        .style(Style::default().bg(palette.base));
    let placeholder = if app.controller.is_listening() {
        "Listening..."
    } else {
        "Type your message..."
    };
    let input = TextInput::new(app.input.content(), &palette)
        .block(input_block)
        .focused(!app.show_settings)
        .placeholder(placeholder);
    frame.render_widget(input, input_area);

    let mut hints = vec![
        KeyHint::new("Enter", "send"),
        KeyHint::new("^S", "settings"),
        KeyHint::new("^T", "theme"),
    ];
    if app.controller.has_recognizer() {
        hints.push(KeyHint::new("^L", "mic"));
    }
    hints.push(KeyHint::new("^C", "quit"));

    let voice = VoiceStatus {
        mic_available: app.controller.has_recognizer(),
        listening: app.controller.is_listening(),
        muted: app.controller.is_muted(),
        speaking: app.controller.is_speaking(),
    };
    let status = StatusBar::new("CHAT", &palette).hints(hints).voice(voice);
    frame.render_widget(status, status_area);

    if app.show_settings {
        let panel = SettingsPanel::new(
            app.settings,
            app.controller.theme() == concierge_engine::Theme::Dark,
            app.controller.is_muted(),
            &palette,
        );
        frame.render_widget(panel, area);
    }
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use concierge_engine::{ChatBackend, ConversationController};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    struct FakeBackend;

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn send(&self, _messages: &[Message]) -> Result<String, ClientError> {
            Ok("ack".to_string())
        }
    }

    fn test_app() -> App {
        App::with_controller(
            ConversationController::new(Arc::new(FakeBackend))
                .with_greeting("Hello! How can I help you with your booking today?"),
        )
    }

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_app(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_tui_version() {
        let version = tui_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_render_shows_greeting_and_hints() {
        let app = test_app();
        let content = render_to_string(&app);
        assert!(content.contains("How can I help you with your booking"));
        assert!(content.contains("send"));
        assert!(content.contains("settings"));
    }

    #[test]
    fn test_render_shows_typing_indicator_while_waiting() {
        let mut app = test_app();
        let history = app.controller.begin_submit("any rooms?");
        assert!(history.is_some());

        let content = render_to_string(&app);
        assert!(content.contains("typing"));
    }

    #[test]
    fn test_render_settings_overlay() {
        let mut app = test_app();
        app.show_settings = true;

        let content = render_to_string(&app);
        assert!(content.contains("Settings"));
        assert!(content.contains("Dark mode"));
    }

    #[test]
    fn test_render_hides_mic_hint_without_recognizer() {
        let app = test_app();
        let content = render_to_string(&app);
        assert!(!content.contains("mic"));
    }
}
