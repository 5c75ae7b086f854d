//! User administration (admins only).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use super::login::is_valid_email;
use crate::api::types::{CreateUserRequest, Role, User};
use crate::ui::components::{centered_rect, LoadingIndicator, TextInput};
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Email,
    Password,
    Role,
}

const FIELDS: [Field; 4] = [Field::Name, Field::Email, Field::Password, Field::Role];

/// Actions returned from the users view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersAction {
    Refresh,
    Create(CreateUserRequest),
}

/// The create-user form shown over the list.
#[derive(Debug)]
struct UserForm {
    name: TextInput,
    email: TextInput,
    password: TextInput,
    role: Role,
    focus: Field,
    validation: Option<String>,
}

impl UserForm {
    fn new() -> Self {
        Self {
            name: TextInput::new(),
            email: TextInput::new(),
            password: TextInput::masked(),
            role: Role::Customer,
            focus: Field::Name,
            validation: None,
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let idx = FIELDS.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % FIELDS.len()
        } else {
            (idx + FIELDS.len() - 1) % FIELDS.len()
        };
        self.focus = FIELDS[next];
    }

    fn cycle_role(&mut self, forward: bool) {
        let idx = Role::ALL.iter().position(|r| *r == self.role).unwrap_or(0);
        let len = Role::ALL.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.role = Role::ALL[next];
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.value().trim().is_empty() {
            return Err("Name is required".to_string());
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

    fn submit(&mut self) -> Option<CreateUserRequest> {
        if let Err(message) = self.validate() {
            self.validation = Some(message);
            return None;
        }
        self.validation = None;
        Some(CreateUserRequest {
            name: self.name.value().trim().to_string(),
            email: self.email.value().trim().to_string(),
            password: self.password.value().to_string(),
            role: self.role,
        })
    }
}

/// User list plus the create-user form.
#[derive(Debug, Default)]
pub struct UsersView {
    selected: usize,
    form: Option<UserForm>,
}

impl UsersView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Whether the create form is open. Global keys are disabled while it is.
    pub fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    pub fn open_form(&mut self) {
        self.form = Some(UserForm::new());
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Called once the server has accepted the new user.
    pub fn user_created(&mut self) {
        self.close_form();
    }

    pub fn validation(&self) -> Option<&str> {
        self.form.as_ref().and_then(|f| f.validation.as_deref())
    }

    pub fn handle_input(
        &mut self,
        key: KeyEvent,
        users: &[User],
        submitting: bool,
    ) -> Option<UsersAction> {
        if let Some(form) = self.form.as_mut() {
            if submitting {
                return None;
            }
            return match (key.code, key.modifiers) {
                (KeyCode::Esc, _) => {
                    self.form = None;
                    None
                }
                (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
                    form.submit().map(UsersAction::Create)
                }
                (KeyCode::Tab, _) | (KeyCode::Down, _) | (KeyCode::Enter, _) => {
                    form.move_focus(true);
                    None
                }
                (KeyCode::BackTab, _) | (KeyCode::Up, _) => {
                    form.move_focus(false);
                    None
                }
                (KeyCode::Left, _) | (KeyCode::Right, _) | (KeyCode::Char(' '), _)
                    if form.focus == Field::Role =>
                {
                    form.cycle_role(key.code != KeyCode::Left);
                    None
                }
                _ => {
                    let changed = match form.focus {
                        Field::Name => form.name.handle_input(key),
                        Field::Email => form.email.handle_input(key),
                        Field::Password => form.password.handle_input(key),
                        Field::Role => false,
                    };
                    if changed {
                        form.validation = None;
                    }
                    None
                }
            };
        }

        let last = users.len().saturating_sub(1);
        self.selected = self.selected.min(last);
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.selected = (self.selected + 1).min(last);
                None
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) => {
                self.selected = 0;
                None
            }
            (KeyCode::Char('G'), _) => {
                self.selected = last;
                None
            }
            (KeyCode::Char('c'), KeyModifiers::NONE) => {
                self.open_form();
                None
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => Some(UsersAction::Refresh),
            _ => None,
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        users: &[User],
        loading: bool,
        spinner: &LoadingIndicator,
    ) {
        let block = Block::default()
            .title(Span::styled(
                format!(" Users ({}) ", users.len()),
                theme::title_style(),
            ))
            .borders(Borders::ALL)
            .border_style(theme::border_style(self.form.is_none()));

        if loading && users.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            spinner.render(frame, inner, "Loading users...");
        } else if users.is_empty() {
            frame.render_widget(
                Paragraph::new("No users yet. Press [c] to create one.")
                    .style(Style::default().fg(theme::MUTED))
                    .alignment(Alignment::Center)
                    .block(block),
                area,
            );
        } else {
            self.selected = self.selected.min(users.len() - 1);
            let header = Row::new(["#", "Name", "Email", "Role"])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rows = users.iter().map(|u| {
                Row::new(vec![
                    Cell::from(u.id.to_string()),
                    Cell::from(u.name.clone()),
                    Cell::from(u.email.clone()),
                    Cell::from(u.role.as_str()).style(Style::default().fg(theme::role_color(u.role))),
                ])
            });
            let table = Table::new(
                rows,
                [
                    Constraint::Length(6),
                    Constraint::Percentage(30),
                    Constraint::Percentage(45),
                    Constraint::Length(10),
                ],
            )
            .header(header)
            .block(block)
            .highlight_style(theme::highlight_style())
            .highlight_symbol("> ");
            let mut state = TableState::default();
            state.select(Some(self.selected));
            frame.render_stateful_widget(table, area, &mut state);
        }

        if let Some(form) = &self.form {
            render_form(frame, area, form, loading, spinner);
        }
    }
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    form: &UserForm,
    submitting: bool,
    spinner: &LoadingIndicator,
) {
    let dialog = centered_rect(56, 19, area);
    frame.render_widget(Clear, dialog);
    let block = Block::default()
        .title(Span::styled(" Create user ", theme::title_style()))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let focused = |field: Field| !submitting && form.focus == field;
    form.name.render(frame, chunks[0], "Name", focused(Field::Name));
    form.email.render(frame, chunks[1], "Email", focused(Field::Email));
    form.password
        .render(frame, chunks[2], "Password", focused(Field::Password));

    let role_line = Line::from(vec![
        Span::styled("◀ ", Style::default().fg(theme::MUTED)),
        Span::styled(
            form.role.as_str(),
            Style::default()
                .fg(theme::role_color(form.role))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(theme::MUTED)),
    ]);
    frame.render_widget(
        Paragraph::new(role_line).block(
            Block::default()
                .title(" Role ")
                .borders(Borders::ALL)
                .border_style(theme::border_style(focused(Field::Role))),
        ),
        chunks[3],
    );

    let status = if submitting {
        Paragraph::new(spinner.text("Creating user...")).style(Style::default().fg(Color::Cyan))
    } else if let Some(message) = &form.validation {
        Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(status.alignment(Alignment::Center), chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
    }

    fn type_str(view: &mut UsersView, s: &str) {
        for c in s.chars() {
            view.handle_input(key(KeyCode::Char(c)), &[], false);
        }
    }

    #[test]
    fn test_create_defaults_to_customer() {
        let mut view = UsersView::new();
        view.handle_input(key(KeyCode::Char('c')), &[], false);
        assert!(view.is_editing());

        type_str(&mut view, "Ann");
        view.handle_input(key(KeyCode::Tab), &[], false);
        type_str(&mut view, "ann@test.com");
        view.handle_input(key(KeyCode::Tab), &[], false);
        type_str(&mut view, "pw");

        assert_eq!(
            view.handle_input(ctrl_s(), &[], false),
            Some(UsersAction::Create(CreateUserRequest {
                name: "Ann".into(),
                email: "ann@test.com".into(),
                password: "pw".into(),
                role: Role::Customer,
            }))
        );
    }

    #[test]
    fn test_role_cycles() {
        let mut view = UsersView::new();
        view.open_form();
        for _ in 0..3 {
            view.handle_input(key(KeyCode::Tab), &[], false);
        }
        view.handle_input(key(KeyCode::Right), &[], false);
        assert_eq!(view.form.as_ref().map(|f| f.role), Some(Role::Admin));
        view.handle_input(key(KeyCode::Left), &[], false);
        view.handle_input(key(KeyCode::Left), &[], false);
        assert_eq!(view.form.as_ref().map(|f| f.role), Some(Role::Agent));
    }

    #[test]
    fn test_validation_messages() {
        let mut view = UsersView::new();
        view.open_form();
        assert_eq!(view.handle_input(ctrl_s(), &[], false), None);
        assert_eq!(view.validation(), Some("Name is required"));

        type_str(&mut view, "Ann");
        view.handle_input(key(KeyCode::Tab), &[], false);
        type_str(&mut view, "nope");
        view.handle_input(ctrl_s(), &[], false);
        assert_eq!(view.validation(), Some("Invalid email address"));
    }

    #[test]
    fn test_escape_closes_form() {
        let mut view = UsersView::new();
        view.open_form();
        view.handle_input(key(KeyCode::Esc), &[], false);
        assert!(!view.is_editing());
    }

    #[test]
    fn test_list_navigation_and_refresh() {
        let users = vec![
            fixtures::user(1, Role::Admin),
            fixtures::user(2, Role::Agent),
        ];
        let mut view = UsersView::new();
        view.handle_input(key(KeyCode::Char('j')), &users, false);
        view.handle_input(key(KeyCode::Char('j')), &users, false);
        assert_eq!(view.selected(), 1);
        assert_eq!(
            view.handle_input(key(KeyCode::Char('r')), &users, false),
            Some(UsersAction::Refresh)
        );
    }

    #[test]
    fn test_form_ignores_input_while_submitting() {
        let mut view = UsersView::new();
        view.open_form();
        view.handle_input(key(KeyCode::Esc), &[], true);
        assert!(view.is_editing());
    }
}
