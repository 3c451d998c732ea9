//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Palette;

/// A key hint for the status bar.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub label: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Voice indicators shown on the right of the status bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceStatus {
    /// A recognizer is attached and can be toggled.
    pub mic_available: bool,
    /// The recognizer is currently listening.
    pub listening: bool,
    /// Spoken replies are muted.
    pub muted: bool,
    /// The synthesizer is currently speaking.
    pub speaking: bool,
}

/// Status bar widget displayed at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct StatusBar<'a> {
    mode: &'a str,
    hints: Vec<KeyHint>,
    voice: VoiceStatus,
    palette: &'a Palette,
}

impl<'a> StatusBar<'a> {
    /// Create a new status bar.
    pub fn new(mode: &'a str, palette: &'a Palette) -> Self {
        Self {
            mode,
            hints: Vec::new(),
            voice: VoiceStatus::default(),
            palette,
        }
    }

    /// Add key hints.
    #[must_use]
    pub fn hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Set the voice indicators.
    #[must_use]
    pub fn voice(mut self, voice: VoiceStatus) -> Self {
        self.voice = voice;
        self
    }

    /// Right-side indicators, one styled span per voice state. An active
    /// mic is marked with the error color, playback with success, and a
    /// muted speaker with warning.
    fn voice_spans(&self) -> Vec<Span<'static>> {
        let bar = Style::default()
            .bg(self.palette.surface)
            .fg(self.palette.subtext);
        let on_surface = |fg| Style::default().bg(self.palette.surface).fg(fg);

        let mut spans = Vec::new();
        if self.voice.mic_available {
            if self.voice.listening {
                spans.push(Span::styled(
                    "mic: listening",
                    on_surface(self.palette.error),
                ));
            } else {
                spans.push(Span::styled("mic: off", bar));
            }
        }
        if self.voice.speaking {
            spans.push(Span::styled("speaking", on_surface(self.palette.success)));
        }
        if self.voice.muted {
            spans.push(Span::styled("muted", on_surface(self.palette.warning)));
        } else {
            spans.push(Span::styled("sound on", bar));
        }

        // Two-space gap between indicators
        let mut joined = Vec::with_capacity(spans.len() * 2);
        for (idx, span) in spans.into_iter().enumerate() {
            if idx > 0 {
                joined.push(Span::styled("  ", bar));
            }
            joined.push(span);
        }
        joined
    }
}

impl Widget for StatusBar<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        // Fill background with surface color
        for x in area.x..area.x.saturating_add(area.width) {
            buf[(x, area.y)].set_char(' ').set_bg(self.palette.surface);
        }

        let bar = Style::default()
            .bg(self.palette.surface)
            .fg(self.palette.subtext);
        let key_style = Style::default()
            .bg(self.palette.surface)
            .fg(self.palette.primary)
            .add_modifier(Modifier::BOLD);

        // Build left side: mode + hints
        let mut spans = Vec::new();
        spans.push(Span::styled(
            format!(" {} ", self.mode),
            Style::default()
                .bg(self.palette.primary)
                .fg(self.palette.base),
        ));
        spans.push(Span::styled(" ", bar));

        for hint in &self.hints {
            spans.push(Span::styled(format!(" {} ", hint.key), key_style));
            spans.push(Span::styled(format!(" {} ", hint.label), bar));
        }

        let left_line = Line::from(spans);
        buf.set_line(area.x, area.y, &left_line, area.width);

        // Right-aligned voice indicators
        let spans = self.voice_spans();
        let right_len = spans
            .iter()
            .map(|span| span.content.width())
            .sum::<usize>() as u16;
        let right = Line::from(spans);
        if right_len < area.width {
            let x = area.x + area.width - right_len - 1;
            buf.set_line(x, area.y, &right, right_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render_to_string(bar: StatusBar<'_>) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_widget(bar, frame.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_status_bar_shows_mode_and_hints() {
        let palette = Palette::dark();
        let bar = StatusBar::new("CHAT", &palette)
            .hints(vec![KeyHint::new("^C", "quit"), KeyHint::new("^S", "settings")]);
        let content = render_to_string(bar);
        assert!(content.contains("CHAT"));
        assert!(content.contains("quit"));
        assert!(content.contains("settings"));
    }

    #[test]
    fn test_status_bar_shows_listening_state() {
        let palette = Palette::dark();
        let bar = StatusBar::new("CHAT", &palette).voice(VoiceStatus {
            mic_available: true,
            listening: true,
            muted: true,
            speaking: false,
        });
        let content = render_to_string(bar);
        assert!(content.contains("mic: listening"));
        assert!(content.contains("muted"));
    }

    #[test]
    fn test_voice_indicator_colors() {
        let palette = Palette::dark();
        let bar = StatusBar::new("CHAT", &palette).voice(VoiceStatus {
            mic_available: true,
            listening: true,
            muted: true,
            speaking: true,
        });

        let styles: Vec<_> = bar
            .voice_spans()
            .iter()
            .map(|span| (span.content.to_string(), span.style.fg))
            .collect();
        assert!(styles.contains(&("mic: listening".to_string(), Some(palette.error))));
        assert!(styles.contains(&("speaking".to_string(), Some(palette.success))));
        assert!(styles.contains(&("muted".to_string(), Some(palette.warning))));
    }

    #[test]
    fn test_idle_indicators_use_plain_bar_style() {
        let palette = Palette::dark();
        let bar = StatusBar::new("CHAT", &palette).voice(VoiceStatus {
            mic_available: true,
            listening: false,
            muted: false,
            speaking: false,
        });

        for span in bar.voice_spans() {
            if span.content.trim().is_empty() {
                continue;
            }
            assert_eq!(span.style.fg, Some(palette.subtext), "{}", span.content);
        }
    }

    #[test]
    fn test_status_bar_hides_mic_when_unavailable() {
        let palette = Palette::dark();
        let bar = StatusBar::new("CHAT", &palette).voice(VoiceStatus::default());
        let content = render_to_string(bar);
        assert!(!content.contains("mic:"));
        assert!(content.contains("sound on"));
    }
}
