//! Transcript widget.
//!
//! Renders the conversation history as a bottom-anchored, scrollable list of
//! speaker-labelled messages, with an animated typing indicator while a reply
//! is pending.

use concierge_engine::{Message, Sender};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::Palette;

/// Animation frames for the typing indicator.
const TYPING_FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// Scroll state for the transcript.
///
/// `from_bottom` counts wrapped lines scrolled up from the latest message.
/// Zero means the view follows new messages as they arrive.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptScroll {
    pub from_bottom: usize,
}

impl TranscriptScroll {
    /// Scroll up by `lines`, clamped by the renderer against content height.
    pub fn scroll_up(&mut self, lines: usize) {
        self.from_bottom = self.from_bottom.saturating_add(lines);
    }

    /// Scroll down by `lines`, back toward the latest message.
    pub fn scroll_down(&mut self, lines: usize) {
        self.from_bottom = self.from_bottom.saturating_sub(lines);
    }

    /// Jump back to the latest message and resume following.
    pub fn to_bottom(&mut self) {
        self.from_bottom = 0;
    }

    /// Whether the view is pinned to the latest message.
    pub fn is_following(&self) -> bool {
        self.from_bottom == 0
    }
}

/// Scrollable transcript of the conversation.
pub struct Transcript<'a> {
    messages: &'a [Message],
    scroll: TranscriptScroll,
    typing: bool,
    tick: usize,
    palette: &'a Palette,
    focused: bool,
}

impl<'a> Transcript<'a> {
    /// Create a new transcript widget over the message history.
    pub fn new(messages: &'a [Message], palette: &'a Palette) -> Self {
        Self {
            messages,
            scroll: TranscriptScroll::default(),
            typing: false,
            tick: 0,
            palette,
            focused: false,
        }
    }

    /// Set the scroll state.
    #[must_use]
    pub fn scroll(mut self, scroll: TranscriptScroll) -> Self {
        self.scroll = scroll;
        self
    }

    /// Show the typing indicator, animated from the tick counter.
    #[must_use]
    pub fn typing(mut self, typing: bool, tick: usize) -> Self {
        self.typing = typing;
        self.tick = tick;
        self
    }

    /// Set whether the transcript pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn sender_style(&self, sender: Sender) -> Style {
        let color = match sender {
            Sender::User => self.palette.user,
            Sender::Bot => self.palette.bot,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Wrap all messages into display lines at the given width.
    fn build_lines(&self, width: usize) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        let body_style = Style::default().fg(self.palette.text);
        // Label column, e.g. "  You  " / "  Bot  ".
        let indent = "       ";
        let body_width = width.saturating_sub(indent.len()).max(1);

        for message in self.messages {
            let label = match message.sender {
                Sender::User => "  You  ",
                Sender::Bot => "  Bot  ",
            };

            let wrapped = textwrap::wrap(&message.text, body_width);
            if wrapped.is_empty() {
                lines.push(Line::from(Span::styled(
                    label,
                    self.sender_style(message.sender),
                )));
            }
            for (idx, segment) in wrapped.iter().enumerate() {
                let prefix = if idx == 0 {
                    Span::styled(label, self.sender_style(message.sender))
                } else {
                    Span::raw(indent)
                };
                lines.push(Line::from(vec![
                    prefix,
                    Span::styled(segment.to_string(), body_style),
                ]));
            }
            // Blank line between messages
            lines.push(Line::default());
        }

        if self.typing {
            let frame = TYPING_FRAMES[self.tick % TYPING_FRAMES.len()];
            lines.push(Line::from(vec![
                Span::styled("  Bot  ", self.sender_style(Sender::Bot)),
                Span::styled(
                    format!("typing{frame}"),
                    Style::default().fg(self.palette.muted),
                ),
            ]));
        }

        lines
    }
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.palette.border_focused)
        } else {
            Style::default().fg(self.palette.border)
        };

        let block = Block::default()
            .title(" Conversation ")
            .title_style(Style::default().fg(self.palette.text))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.palette.base));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let lines = self.build_lines(inner.width as usize);
        let height = inner.height as usize;

        // Bottom-anchored window: the last `height` lines when following,
        // shifted up by the scroll offset otherwise. The offset is clamped
        // so scrolling past the first message stops at the top.
        let max_offset = lines.len().saturating_sub(height);
        let offset = self.scroll.from_bottom.min(max_offset);
        let start = max_offset - offset;

        let visible: Vec<Line<'_>> = lines.into_iter().skip(start).take(height).collect();
        Paragraph::new(visible).render(inner, buf);
    }
}
