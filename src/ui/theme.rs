//! Theme and styling configuration.
//!
//! Colors for statuses, priorities and roles are chosen by name, so new
//! lookup values from the server still render with a sensible default.

use ratatui::style::{Color, Modifier, Style};

use crate::api::types::Role;

/// Accent used for titles and focused borders.
pub const ACCENT: Color = Color::Cyan;

/// Color used for focused inputs.
pub const FOCUS: Color = Color::Yellow;

/// Muted text.
pub const MUTED: Color = Color::DarkGray;

/// Get color for a status name.
pub fn status_color(name: &str) -> Color {
    let name = name.to_lowercase();
    if name.contains("open") {
        Color::Blue
    } else if name.contains("progress") {
        Color::Yellow
    } else if name.contains("resolved") {
        Color::Green
    } else if name.contains("closed") {
        Color::DarkGray
    } else {
        Color::White
    }
}

/// Get color for a priority name.
pub fn priority_color(name: &str) -> Color {
    let name = name.to_lowercase();
    if name.contains("high") || name.contains("urgent") || name.contains("critical") {
        Color::Red
    } else if name.contains("medium") {
        Color::Yellow
    } else if name.contains("low") {
        Color::Cyan
    } else {
        Color::White
    }
}

/// Get indicator symbol for a priority name.
pub fn priority_indicator(name: &str) -> &'static str {
    let name = name.to_lowercase();
    if name.contains("high") || name.contains("urgent") || name.contains("critical") {
        "⬆"
    } else if name.contains("medium") {
        "⬌"
    } else if name.contains("low") {
        "⬇"
    } else {
        "•"
    }
}

/// Get color for a role.
pub fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Magenta,
        Role::Agent => Color::Green,
        Role::Customer => Color::Blue,
    }
}

/// Style for section titles.
pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Style for the highlighted row of a list or table.
pub fn highlight_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// Border style depending on focus.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUS)
    } else {
        Style::default().fg(MUTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color("Open"), Color::Blue);
        assert_eq!(status_color("In Progress"), Color::Yellow);
        assert_eq!(status_color("Resolved"), Color::Green);
        assert_eq!(status_color("Closed"), Color::DarkGray);
        assert_eq!(status_color("Unknown"), Color::White);
    }

    #[test]
    fn test_priority_colors() {
        assert_eq!(priority_color("High"), Color::Red);
        assert_eq!(priority_color("medium"), Color::Yellow);
        assert_eq!(priority_color("Low"), Color::Cyan);
        assert_eq!(priority_color("None"), Color::White);
    }

    #[test]
    fn test_priority_indicator() {
        assert_eq!(priority_indicator("High"), "⬆");
        assert_eq!(priority_indicator("Low"), "⬇");
        assert_eq!(priority_indicator("whatever"), "•");
    }
}
