//! Centralized theme configuration for the demo editor.
//!
//! All colors and styles are defined here. Render code uses
//! `theme::module::CONSTANT` rather than hardcoding `Color::*` values.
//!
//! Theme: Galaxy - Purple/pink accents with deep space blue background

use ratatui::style::{Color, Modifier, Style};

/// Core color palette - shared base colors.
pub mod palette {
    use super::*;

    pub const TEXT: Color = Color::Rgb(236, 236, 244);
    pub const TEXT_DIM: Color = Color::Rgb(90, 92, 119);
    pub const TEXT_MUTED: Color = Color::Rgb(130, 133, 158);

    pub const BG_DARK: Color = Color::Rgb(26, 26, 46);

    pub const SUCCESS: Color = Color::Rgb(107, 203, 119);
    pub const WARNING: Color = Color::Rgb(255, 217, 61);
    pub const INFO: Color = Color::Rgb(0, 217, 255);

    pub const PURPLE: Color = Color::Rgb(189, 147, 249);
    pub const PINK: Color = Color::Rgb(255, 107, 157);
}

/// Editor pane styles
pub mod editor {
    use super::*;

    pub const TEXT: Style = Style::new().fg(palette::TEXT);
    pub const BORDER_FOCUSED: Color = palette::PURPLE;
    pub const BORDER_UNFOCUSED: Color = palette::TEXT_DIM;
    pub const TITLE: Style = Style::new().fg(palette::PINK).add_modifier(Modifier::BOLD);
    pub const BACKGROUND: Color = palette::BG_DARK;

    /// Ghost text before the italic hint is applied
    pub const GHOST: Style = Style::new().fg(palette::TEXT_MUTED);
}

/// Footer (status line) styles
pub mod footer {
    use super::*;

    pub const STATE_IDLE: Color = palette::TEXT_MUTED;
    pub const STATE_BUSY: Color = palette::INFO;
    pub const STATE_DISPLAYED: Color = palette::SUCCESS;
    pub const STATE_DISABLED: Color = palette::TEXT_DIM;
    pub const STATS: Style = Style::new().fg(palette::TEXT_MUTED);
    pub const KEY: Style = Style::new().fg(palette::PURPLE);
    pub const DESCRIPTION: Style = Style::new().fg(palette::TEXT_MUTED);
    pub const SEPARATOR: Style = Style::new().fg(palette::TEXT_DIM);
    pub const WARNING: Style = Style::new().fg(palette::WARNING);
}
