//! Toast notifications.
//!
//! Confirmations such as "Ticket created" are shown as short-lived toasts in
//! the bottom-right corner. Failures that need acknowledgement use the
//! error dialog instead.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Maximum number of toasts on screen at once.
const MAX_VISIBLE: usize = 3;

/// The kind of notification, which determines its appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    /// Get the icon for this kind.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Info => "ℹ",
            NotificationKind::Success => "✓",
            NotificationKind::Warning => "⚠",
            NotificationKind::Error => "✗",
        }
    }

    /// Get the color for this kind.
    pub fn color(&self) -> Color {
        match self {
            NotificationKind::Info => Color::Blue,
            NotificationKind::Success => Color::Green,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Error => Color::Red,
        }
    }

    fn default_duration(&self) -> Duration {
        match self {
            NotificationKind::Info | NotificationKind::Success => Duration::from_secs(3),
            NotificationKind::Warning | NotificationKind::Error => Duration::from_secs(5),
        }
    }
}

/// A single toast.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    /// Create a notification with the default duration for its kind.
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration: kind.default_duration(),
        }
    }

    /// Override the display duration.
    #[cfg(test)]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Check if the notification has expired.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// Manages the visible toasts.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
}

impl NotificationManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification, dropping the oldest past the limit.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_VISIBLE {
            self.notifications.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Info));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Warning));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationKind::Error));
    }

    /// Remove expired notifications.
    ///
    /// This should be called on each tick.
    pub fn tick(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    pub fn clear(&mut self) {
        self.notifications.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Render the toasts stacked in the bottom-right corner of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let width = 50.min(area.width.saturating_sub(4));
        // Borders plus the icon prefix.
        let inner_width = width.saturating_sub(4) as usize;

        let heights: Vec<u16> = self
            .notifications
            .iter()
            .map(|n| {
                let text_len = n.message.chars().count() + 2;
                let lines = if inner_width > 0 {
                    text_len.div_ceil(inner_width) as u16
                } else {
                    1
                };
                lines + 2
            })
            .collect();

        let total_height = heights
            .iter()
            .sum::<u16>()
            .min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width + 2);
        let y = area.y + area.height.saturating_sub(total_height + 1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(heights.iter().map(|&h| Constraint::Length(h)))
            .split(Rect::new(x, y, width, total_height));

        for (notification, chunk) in self.notifications.iter().zip(chunks.iter()) {
            render_notification(notification, frame, *chunk);
        }
    }
}

fn render_notification(notification: &Notification, frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);

    let style = Style::default().fg(notification.kind.color());
    let text = Line::from(vec![
        Span::styled(
            format!("{} ", notification.kind.icon()),
            style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(notification.message.as_str(), style),
    ]);

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(style))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        assert_eq!(
            Notification::new("x", NotificationKind::Success).duration,
            Duration::from_secs(3)
        );
        assert_eq!(
            Notification::new("x", NotificationKind::Error).duration,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_not_expired_when_fresh() {
        assert!(!Notification::new("Ticket created", NotificationKind::Success).is_expired());
    }

    #[test]
    fn test_manager_caps_visible() {
        let mut manager = NotificationManager::new();
        manager.info("1");
        manager.success("2");
        manager.warning("3");
        manager.error("4");
        assert_eq!(manager.len(), MAX_VISIBLE);
        let messages: Vec<&str> = manager.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_manager_tick_removes_expired() {
        let mut manager = NotificationManager::new();
        manager.push(
            Notification::new("gone", NotificationKind::Info).with_duration(Duration::from_millis(1)),
        );
        manager.success("stays");
        std::thread::sleep(Duration::from_millis(5));
        manager.tick();
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.iter().next().map(|n| n.message.as_str()), Some("stays"));
    }

    #[test]
    fn test_manager_clear() {
        let mut manager = NotificationManager::new();
        manager.info("Test");
        manager.clear();
        assert!(manager.is_empty());
    }
}
