//! Comment thread for the ticket detail screen.
//!
//! Renders the comments held by the comments slice, marks the signed-in
//! user's own comments, and owns the composer used to post a new one.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

use super::{LoadingIndicator, TextEditor};
use crate::api::types::Comment;
use crate::ui::theme;

/// Parse a server timestamp.
///
/// Accepts RFC 3339 and the bare `YYYY-MM-DD HH:MM:SS` form, which is read
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Absolute local time, `YYYY-MM-DD HH:MM`. Unparseable input is returned as is.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Time since `raw`, relative to `now`.
///
/// Falls back to the absolute time after a day.
pub fn relative_time(raw: &str, now: DateTime<Utc>) -> String {
    let Some(ts) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let elapsed = now.signed_duration_since(ts);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else {
        format_timestamp(raw)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Action resulting from comment thread input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentAction {
    /// Post a comment with the given text.
    Submit(String),
    /// The composer was closed.
    Cancel,
}

/// The comment thread and its composer.
#[derive(Debug, Default)]
pub struct CommentThread {
    scroll: usize,
    max_scroll: usize,
    composing: bool,
    editor: TextEditor,
    /// Validation message shown in the composer.
    notice: Option<String>,
}

impl CommentThread {
    pub fn new() -> Self {
        Self {
            editor: TextEditor::new().with_placeholder("Write a comment..."),
            ..Self::default()
        }
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn start_composing(&mut self) {
        self.composing = true;
        self.notice = None;
    }

    /// Close the composer and discard the draft. Called once the server
    /// accepted the comment.
    pub fn finish_composing(&mut self) {
        self.composing = false;
        self.editor.clear();
        self.notice = None;
    }

    /// Reset scroll and composer for a different ticket.
    pub fn reset(&mut self) {
        self.finish_composing();
        self.scroll = 0;
        self.max_scroll = 0;
    }

    /// Handle keyboard input.
    ///
    /// While composing, all keys go to the editor except Ctrl+S and Esc.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<CommentAction> {
        if self.composing {
            return self.handle_composing_input(key);
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.scroll = (self.scroll + 1).min(self.max_scroll);
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            (KeyCode::PageDown, _) => {
                self.scroll = (self.scroll + 10).min(self.max_scroll);
            }
            (KeyCode::PageUp, _) => {
                self.scroll = self.scroll.saturating_sub(10);
            }
            _ => {}
        }
        None
    }

    fn handle_composing_input(&mut self, key: KeyEvent) -> Option<CommentAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                if self.editor.is_blank() {
                    self.notice = Some("Comment cannot be empty".to_string());
                    return None;
                }
                self.notice = None;
                Some(CommentAction::Submit(self.editor.content().trim().to_string()))
            }
            (KeyCode::Esc, _) => {
                self.composing = false;
                self.notice = None;
                Some(CommentAction::Cancel)
            }
            _ => {
                if self.editor.handle_input(key) {
                    self.notice = None;
                }
                None
            }
        }
    }

    /// Render the thread (and the composer, when open).
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        comments: &[Comment],
        me: Option<i64>,
        loading: bool,
        submitting: bool,
        spinner: &LoadingIndicator,
    ) {
        let (thread_area, composer_area) = if self.composing {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(4), Constraint::Length(7)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        let block = Block::default()
            .title(Span::styled(
                format!(" Comments ({}) ", comments.len()),
                theme::title_style(),
            ))
            .borders(Borders::ALL)
            .border_style(theme::border_style(false));
        let inner = block.inner(thread_area);
        frame.render_widget(block, thread_area);

        if loading && comments.is_empty() {
            spinner.render(frame, inner, "Loading comments...");
        } else if comments.is_empty() {
            frame.render_widget(
                Paragraph::new("No comments yet.")
                    .style(Style::default().fg(theme::MUTED))
                    .alignment(Alignment::Center),
                inner,
            );
        } else {
            self.render_comments(frame, inner, comments, me);
        }

        if let Some(composer_area) = composer_area {
            let title = if submitting {
                spinner.text("Posting comment...")
            } else if let Some(notice) = &self.notice {
                notice.clone()
            } else {
                "New comment (Ctrl+S to post)".to_string()
            };
            self.editor.render(frame, composer_area, &title, !submitting);
        }
    }

    fn render_comments(&mut self, frame: &mut Frame, area: Rect, comments: &[Comment], me: Option<i64>) {
        let now = Utc::now();
        let mut lines: Vec<Line> = Vec::new();

        for (i, comment) in comments.iter().enumerate() {
            if i > 0 {
                lines.push(Line::raw(""));
            }
            let mine = me == Some(comment.author_id);
            let author = if comment.author_name.is_empty() {
                comment.author_email.as_str()
            } else {
                comment.author_name.as_str()
            };
            let mut header = vec![Span::styled(
                author.to_string(),
                Style::default()
                    .fg(if mine { Color::Green } else { theme::ACCENT })
                    .add_modifier(Modifier::BOLD),
            )];
            if mine {
                header.push(Span::styled(" (me)", Style::default().fg(Color::Green)));
            }
            header.push(Span::styled(
                format!("  {}", relative_time(&comment.created_at, now)),
                Style::default().fg(theme::MUTED),
            ));
            lines.push(Line::from(header));
            lines.extend(comment.content.lines().map(|l| Line::from(l.to_string())));
        }

        // Wrapped lines are not counted, so long comments may scroll short.
        self.max_scroll = lines.len().saturating_sub(area.height as usize);
        self.scroll = self.scroll.min(self.max_scroll);

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);

        if self.max_scroll > 0 {
            let mut state = ScrollbarState::new(self.max_scroll).position(self.scroll);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut state,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_parse_rfc3339_and_plain() {
        assert_eq!(parse_timestamp("2024-05-01T10:00:00.000Z"), Some(at(10, 0, 0)));
        assert_eq!(parse_timestamp("2024-05-01 10:00:00"), Some(at(10, 0, 0)));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_relative_time_just_now() {
        assert_eq!(relative_time("2024-05-01T10:00:00Z", at(10, 0, 30)), "just now");
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        assert_eq!(relative_time("2024-05-01T10:05:00Z", at(10, 0, 0)), "just now");
    }

    #[test]
    fn test_relative_time_minutes() {
        assert_eq!(relative_time("2024-05-01T10:00:00Z", at(10, 1, 0)), "1 minute ago");
        assert_eq!(relative_time("2024-05-01T10:00:00Z", at(10, 45, 0)), "45 minutes ago");
    }

    #[test]
    fn test_relative_time_hours() {
        assert_eq!(relative_time("2024-05-01T08:00:00Z", at(10, 0, 0)), "2 hours ago");
    }

    #[test]
    fn test_relative_time_falls_back_to_date() {
        let text = relative_time("2024-04-20T10:00:00Z", at(10, 0, 0));
        assert!(text.starts_with("2024-04-"), "{}", text);
    }

    #[test]
    fn test_relative_time_unparseable_passes_through() {
        assert_eq!(relative_time("not a date", at(10, 0, 0)), "not a date");
    }

    #[test]
    fn test_empty_comment_rejected() {
        let mut thread = CommentThread::new();
        thread.start_composing();
        thread.handle_input(key(KeyCode::Char(' ')));
        assert_eq!(thread.handle_input(ctrl_s()), None);
        assert!(thread.notice.is_some());
        assert!(thread.is_composing());
    }

    #[test]
    fn test_submit_trims_content() {
        let mut thread = CommentThread::new();
        thread.start_composing();
        for c in " hi ".chars() {
            thread.handle_input(key(KeyCode::Char(c)));
        }
        assert_eq!(
            thread.handle_input(ctrl_s()),
            Some(CommentAction::Submit("hi".to_string()))
        );
        // Draft survives until the server accepts it.
        assert!(thread.is_composing());
        thread.finish_composing();
        assert!(!thread.is_composing());
        assert!(thread.editor.is_blank());
    }

    #[test]
    fn test_escape_closes_composer_keeps_draft() {
        let mut thread = CommentThread::new();
        thread.start_composing();
        thread.handle_input(key(KeyCode::Char('x')));
        assert_eq!(thread.handle_input(key(KeyCode::Esc)), Some(CommentAction::Cancel));
        assert!(!thread.is_composing());
        assert_eq!(thread.editor.content(), "x");
    }

    #[test]
    fn test_scroll_clamped_to_max() {
        let mut thread = CommentThread::new();
        thread.max_scroll = 2;
        for _ in 0..5 {
            thread.handle_input(key(KeyCode::Char('j')));
        }
        assert_eq!(thread.scroll(), 2);
        thread.handle_input(key(KeyCode::Char('k')));
        assert_eq!(thread.scroll(), 1);
    }
}
