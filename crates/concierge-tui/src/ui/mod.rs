//! UI module for the concierge TUI.

pub mod theme;
pub mod widgets;

pub use theme::*;
pub use widgets::*;
