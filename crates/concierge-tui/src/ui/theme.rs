//! Catppuccin color palettes for the TUI.
//!
//! The dark palette is Mocha and the light palette is Latte. Every widget
//! takes a `&Palette` so the active theme can flip at runtime.

use concierge_engine::Theme;
use ratatui::style::Color;

/// Resolved color palette for the active theme.
#[derive(Debug, Clone)]
pub struct Palette {
    // Backgrounds
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,

    // Speaker attribution
    pub user: Color,
    pub bot: Color,

    // Semantic
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Palette {
    /// Resolve the palette for a theme selection.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Catppuccin Mocha (dark theme).
    pub fn dark() -> Self {
        Self {
            // Backgrounds
            base: Color::Rgb(30, 30, 46),    // #1e1e2e
            surface: Color::Rgb(49, 50, 68), // #313244
            overlay: Color::Rgb(69, 71, 90), // #45475a

            // Foregrounds
            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            // Accents
            primary: Color::Rgb(180, 190, 254), // #b4befe (lavender)

            // Speaker attribution
            user: Color::Rgb(137, 180, 250), // #89b4fa (blue)
            bot: Color::Rgb(250, 179, 135),  // #fab387 (peach)

            // Semantic
            success: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
            warning: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
            error: Color::Rgb(243, 139, 168),   // #f38ba8 (red)

            // Borders
            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Catppuccin Latte (light theme).
    pub fn light() -> Self {
        Self {
            // Backgrounds
            base: Color::Rgb(239, 241, 245),    // #eff1f5
            surface: Color::Rgb(230, 233, 239), // #e6e9ef
            overlay: Color::Rgb(220, 224, 232), // #dce0e8

            // Foregrounds
            text: Color::Rgb(76, 79, 105),    // #4c4f69
            subtext: Color::Rgb(92, 95, 119), // #5c5f77
            muted: Color::Rgb(140, 143, 161), // #8c8fa1

            // Accents
            primary: Color::Rgb(114, 135, 253), // #7287fd (lavender)

            // Speaker attribution
            user: Color::Rgb(30, 102, 245), // #1e66f5 (blue)
            bot: Color::Rgb(254, 100, 11),  // #fe640b (peach)

            // Semantic
            success: Color::Rgb(64, 160, 43),  // #40a02b (green)
            warning: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
            error: Color::Rgb(210, 15, 57),    // #d20f39 (red)

            // Borders
            border: Color::Rgb(188, 192, 204),         // #bcc0cc
            border_focused: Color::Rgb(114, 135, 253), // #7287fd (lavender)
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_palette_creates() {
        let palette = Palette::dark();
        assert!(matches!(palette.base, Color::Rgb(30, 30, 46)));
    }

    #[test]
    fn test_light_palette_creates() {
        let palette = Palette::light();
        assert!(matches!(palette.base, Color::Rgb(239, 241, 245)));
    }

    #[test]
    fn test_for_theme_maps_both_variants() {
        assert!(matches!(
            Palette::for_theme(Theme::Dark).base,
            Color::Rgb(30, 30, 46)
        ));
        assert!(matches!(
            Palette::for_theme(Theme::Light).base,
            Color::Rgb(239, 241, 245)
        ));
    }
}
