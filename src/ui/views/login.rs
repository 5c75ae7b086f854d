//! Sign-in and sign-up screen.
//!
//! One form serves both routes: sign-up adds a name field. Client-side
//! validation runs before anything is sent; server errors come from the
//! auth slice and are shown under the form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::components::{centered_rect, LoadingIndicator, TextInput};
use crate::ui::theme;

/// Whether `email` looks like an address: something, `@`, then a domain
/// containing a dot with text on both sides. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    clean(local)
        && clean(domain)
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Which form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Password,
}

/// Actions returned from the login view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Switch between sign-in and sign-up.
    SwitchMode,
}

/// The sign-in / sign-up form.
#[derive(Debug)]
pub struct LoginView {
    mode: LoginMode,
    name: TextInput,
    email: TextInput,
    password: TextInput,
    focus: Field,
    /// Client-side validation message.
    validation: Option<String>,
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            mode: LoginMode::SignIn,
            name: TextInput::new().with_placeholder("Full name"),
            email: TextInput::new().with_placeholder("you@example.com"),
            password: TextInput::masked(),
            focus: Field::Email,
            validation: None,
        }
    }

    pub fn mode(&self) -> LoginMode {
        self.mode
    }

    /// Switch form. Typed values are kept.
    pub fn set_mode(&mut self, mode: LoginMode) {
        self.mode = mode;
        self.validation = None;
        self.focus = match mode {
            LoginMode::SignIn => Field::Email,
            LoginMode::SignUp => Field::Name,
        };
    }

    /// Clear all fields, e.g. after logout.
    pub fn reset(&mut self) {
        let mode = self.mode;
        *self = Self::new();
        self.set_mode(mode);
    }

    pub fn validation(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    fn fields(&self) -> &'static [Field] {
        match self.mode {
            LoginMode::SignIn => &[Field::Email, Field::Password],
            LoginMode::SignUp => &[Field::Name, Field::Email, Field::Password],
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn input_mut(&mut self, field: Field) -> &mut TextInput {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    /// Check the fields, returning the first problem found.
    fn validate(&self) -> Result<(), String> {
        if self.mode == LoginMode::SignUp && self.name.value().trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        let email = self.email.value().trim();
        if email.is_empty() {
            return Err("Email is required".to_string());
        }
        if !is_valid_email(email) {
            return Err("Invalid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(())
    }

    fn submit(&mut self) -> Option<LoginAction> {
        if let Err(message) = self.validate() {
            self.validation = Some(message);
            return None;
        }
        self.validation = None;
        let email = self.email.value().trim().to_string();
        let password = self.password.value().to_string();
        Some(match self.mode {
            LoginMode::SignIn => LoginAction::Login { email, password },
            LoginMode::SignUp => LoginAction::Register {
                name: self.name.value().trim().to_string(),
                email,
                password,
            },
        })
    }

    /// Handle keyboard input. Input is ignored while a request is pending.
    pub fn handle_input(&mut self, key: KeyEvent, pending: bool) -> Option<LoginAction> {
        if pending {
            return None;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.move_focus(true);
                None
            }
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
                self.move_focus(false);
                None
            }
            (KeyCode::Enter, _) => {
                if self.focus == Field::Password {
                    self.submit()
                } else {
                    self.move_focus(true);
                    None
                }
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => Some(LoginAction::SwitchMode),
            _ => {
                let focus = self.focus;
                if self.input_mut(focus).handle_input(key) {
                    self.validation = None;
                }
                None
            }
        }
    }

    /// Render the form centered in `area`.
    ///
    /// `server_error` is the auth slice error, shown when there is no local
    /// validation message.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        server_error: Option<&str>,
        pending: bool,
        spinner: &LoadingIndicator,
    ) {
        let field_count = self.fields().len() as u16;
        let dialog_area = centered_rect(56, field_count * 3 + 9, area);
        frame.render_widget(Clear, dialog_area);

        let title = match self.mode {
            LoginMode::SignIn => " Sign in ",
            LoginMode::SignUp => " Create account ",
        };
        let block = Block::default()
            .title(Span::styled(title, theme::title_style()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let mut constraints: Vec<Constraint> =
            self.fields().iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        for (i, field) in self.fields().iter().enumerate() {
            let (input, label) = match field {
                Field::Name => (&self.name, "Full name"),
                Field::Email => (&self.email, "Email"),
                Field::Password => (&self.password, "Password"),
            };
            input.render(frame, chunks[i], label, !pending && self.focus == *field);
        }

        let status_area = chunks[self.fields().len()];
        let status = if pending {
            Paragraph::new(spinner.text(match self.mode {
                LoginMode::SignIn => "Signing in...",
                LoginMode::SignUp => "Creating account...",
            }))
            .style(Style::default().fg(Color::Cyan))
        } else if let Some(message) = self.validation.as_deref().or(server_error) {
            Paragraph::new(message).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        };
        frame.render_widget(
            status.alignment(Alignment::Center).wrap(Wrap { trim: true }),
            status_area,
        );

        let switch_hint = match self.mode {
            LoginMode::SignIn => "No account? Ctrl+R to sign up",
            LoginMode::SignUp => "Have an account? Ctrl+R to sign in",
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                switch_hint,
                Style::default().fg(theme::MUTED),
            )))
            .alignment(Alignment::Center),
            chunks[self.fields().len() + 1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(view: &mut LoginView, s: &str) {
        for c in s.chars() {
            view.handle_input(key(KeyCode::Char(c)), false);
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@test.com"));
        assert!(is_valid_email("a.b@mail.example.org"));
        assert!(!is_valid_email("user@test"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@test."));
        assert!(!is_valid_email("@test.com"));
        assert!(!is_valid_email("us er@test.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("usertest.com"));
    }

    #[test]
    fn test_login_submit() {
        let mut view = LoginView::new();
        type_str(&mut view, "user@test.com");
        view.handle_input(key(KeyCode::Tab), false);
        type_str(&mut view, "pw123");
        assert_eq!(
            view.handle_input(key(KeyCode::Enter), false),
            Some(LoginAction::Login {
                email: "user@test.com".to_string(),
                password: "pw123".to_string(),
            })
        );
    }

    #[test]
    fn test_enter_on_email_moves_to_password() {
        let mut view = LoginView::new();
        type_str(&mut view, "user@test.com");
        assert_eq!(view.handle_input(key(KeyCode::Enter), false), None);
        assert_eq!(view.focus, Field::Password);
    }

    #[test]
    fn test_missing_password_rejected() {
        let mut view = LoginView::new();
        type_str(&mut view, "user@test.com");
        view.handle_input(key(KeyCode::Tab), false);
        assert_eq!(view.handle_input(key(KeyCode::Enter), false), None);
        assert_eq!(view.validation(), Some("Password is required"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut view = LoginView::new();
        type_str(&mut view, "nope");
        view.handle_input(key(KeyCode::Tab), false);
        type_str(&mut view, "pw");
        assert_eq!(view.handle_input(key(KeyCode::Enter), false), None);
        assert_eq!(view.validation(), Some("Invalid email address"));
    }

    #[test]
    fn test_register_requires_name() {
        let mut view = LoginView::new();
        view.set_mode(LoginMode::SignUp);
        view.handle_input(key(KeyCode::Tab), false);
        type_str(&mut view, "new@test.com");
        view.handle_input(key(KeyCode::Tab), false);
        type_str(&mut view, "pw");
        assert_eq!(view.handle_input(key(KeyCode::Enter), false), None);
        assert_eq!(view.validation(), Some("Full name is required"));
    }

    #[test]
    fn test_register_submit() {
        let mut view = LoginView::new();
        view.set_mode(LoginMode::SignUp);
        type_str(&mut view, "Dana");
        view.handle_input(key(KeyCode::Tab), false);
        type_str(&mut view, "dana@test.com");
        view.handle_input(key(KeyCode::Tab), false);
        type_str(&mut view, "secret");
        assert_eq!(
            view.handle_input(key(KeyCode::Enter), false),
            Some(LoginAction::Register {
                name: "Dana".to_string(),
                email: "dana@test.com".to_string(),
                password: "secret".to_string(),
            })
        );
    }

    #[test]
    fn test_switch_mode_shortcut() {
        let mut view = LoginView::new();
        let ctrl_r = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(view.handle_input(ctrl_r, false), Some(LoginAction::SwitchMode));
    }

    #[test]
    fn test_input_ignored_while_pending() {
        let mut view = LoginView::new();
        view.handle_input(key(KeyCode::Char('x')), true);
        assert!(view.email.is_empty());
    }

    #[test]
    fn test_focus_wraps() {
        let mut view = LoginView::new();
        view.handle_input(key(KeyCode::BackTab), false);
        assert_eq!(view.focus, Field::Password);
    }

    #[test]
    fn test_reset_keeps_mode() {
        let mut view = LoginView::new();
        view.set_mode(LoginMode::SignUp);
        type_str(&mut view, "Dana");
        view.reset();
        assert_eq!(view.mode(), LoginMode::SignUp);
        assert!(view.name.is_empty());
    }
}
