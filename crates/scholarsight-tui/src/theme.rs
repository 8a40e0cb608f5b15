use ratatui::style::{Color, Modifier, Style};

use crate::model::breakdown::LineKind;

/// Color theme for the TUI.
pub struct Theme {
    pub accent: Color,
    pub error: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub selection_bg: Color,
    pub popup_fg: Color,
    pub popup_bg: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Dark slate theme with cyan accents.
    pub fn slate() -> Self {
        Self {
            accent: Color::Cyan,
            error: Color::LightRed,

            header_fg: Color::Black,
            header_bg: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 41, 59),
            selection_bg: Color::Rgb(22, 78, 99),
            popup_fg: Color::White,
            popup_bg: Color::Rgb(8, 145, 178),
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    pub fn line_style(&self, kind: LineKind) -> Style {
        match kind {
            LineKind::Title => Style::default().fg(self.accent).add_modifier(Modifier::BOLD),
            LineKind::Text | LineKind::Bullet | LineKind::BulletContinuation => {
                Style::default().fg(self.text)
            }
            LineKind::Blank => Style::default(),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg).add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default().bg(self.highlight_bg).add_modifier(Modifier::BOLD)
    }

    pub fn selection_style(&self) -> Style {
        Style::default().bg(self.selection_bg)
    }

    pub fn popup_style(&self) -> Style {
        Style::default().fg(self.popup_fg).bg(self.popup_bg).add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
