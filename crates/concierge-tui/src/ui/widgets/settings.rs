//! Settings overlay widget.
//!
//! A small centered panel with the runtime toggles: dark mode and mute.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::ui::theme::Palette;

/// Number of selectable rows in the settings panel.
pub const SETTINGS_ROWS: usize = 2;

/// Settings panel state.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsState {
    /// Selected row index.
    pub cursor: usize,
}

impl SettingsState {
    /// Move the selection up, stopping at the first row.
    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the selection down, stopping at the last row.
    pub fn down(&mut self) {
        if self.cursor + 1 < SETTINGS_ROWS {
            self.cursor += 1;
        }
    }
}

/// Centered settings overlay.
pub struct SettingsPanel<'a> {
    state: SettingsState,
    dark_mode: bool,
    muted: bool,
    palette: &'a Palette,
}

impl<'a> SettingsPanel<'a> {
    pub fn new(state: SettingsState, dark_mode: bool, muted: bool, palette: &'a Palette) -> Self {
        Self {
            state,
            dark_mode,
            muted,
            palette,
        }
    }

    fn toggle_row(&self, index: usize, label: &str, enabled: bool) -> Line<'a> {
        let selected = self.state.cursor == index;
        let marker = if selected { "> " } else { "  " };
        let switch = if enabled { "[on] " } else { "[off]" };

        let label_style = if selected {
            Style::default()
                .fg(self.palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.text)
        };
        let switch_style = if enabled {
            Style::default().fg(self.palette.success)
        } else {
            Style::default().fg(self.palette.muted)
        };

        Line::from(vec![
            Span::styled(format!("{marker}{label:<12}"), label_style),
            Span::styled(switch.to_string(), switch_style),
        ])
    }
}

impl Widget for SettingsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 28.min(area.width);
        let height = 6.min(area.height);
        let panel = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        Clear.render(panel, buf);

        let block = Block::default()
            .title(" Settings ")
            .title_style(Style::default().fg(self.palette.text))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.border_focused))
            .style(Style::default().bg(self.palette.overlay));

        let inner = block.inner(panel);
        block.render(panel, buf);

        if inner.height < 1 {
            return;
        }

        let lines = vec![
            self.toggle_row(0, "Dark mode", self.dark_mode),
            self.toggle_row(1, "Mute", self.muted),
            Line::default(),
            Line::from(Span::styled(
                " Enter toggles, Esc closes",
                Style::default().fg(self.palette.muted),
            )),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
