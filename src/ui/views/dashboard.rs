//! Role-specific dashboard.
//!
//! Statistics are computed from the cached ticket and user lists on every
//! render; the functions below are pure so they can be tested directly.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::types::{Role, Ticket, User};
use crate::ui::components::LoadingIndicator;
use crate::ui::theme;

/// Ticket count for one status name, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub name: String,
    pub count: usize,
}

/// Open tickets assigned to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentLoad {
    pub name: String,
    pub open: usize,
}

/// Admin overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStats {
    pub total: usize,
    pub unassigned: usize,
    pub by_status: Vec<StatusCount>,
    pub workload: Vec<AgentLoad>,
}

/// Agent or customer overview of "my" tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalStats {
    pub mine: usize,
    pub by_status: Vec<StatusCount>,
}

/// Group tickets by status name. Tickets without a status count as "Unknown".
pub fn count_by_status<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    for ticket in tickets {
        let name = ticket.status_label();
        match counts.iter_mut().find(|c| c.name == name) {
            Some(entry) => entry.count += 1,
            None => counts.push(StatusCount {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

pub fn admin_stats(tickets: &[Ticket], users: &[User]) -> AdminStats {
    let workload = users
        .iter()
        .filter(|u| u.role == Role::Agent)
        .map(|agent| AgentLoad {
            name: agent.name.clone(),
            open: tickets
                .iter()
                .filter(|t| t.assigned_to == Some(agent.id) && !t.is_closed())
                .count(),
        })
        .collect();

    AdminStats {
        total: tickets.len(),
        unassigned: tickets.iter().filter(|t| !t.is_assigned()).count(),
        by_status: count_by_status(tickets),
        workload,
    }
}

/// Tickets assigned to the agent.
pub fn agent_stats(tickets: &[Ticket], agent_id: i64) -> PersonalStats {
    let mine: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| t.assigned_to == Some(agent_id))
        .collect();
    PersonalStats {
        mine: mine.len(),
        by_status: count_by_status(mine),
    }
}

/// Tickets the customer created.
pub fn customer_stats(tickets: &[Ticket], customer_id: i64) -> PersonalStats {
    let mine: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| t.created_by == customer_id)
        .collect();
    PersonalStats {
        mine: mine.len(),
        by_status: count_by_status(mine),
    }
}

/// Render the dashboard for `user`.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    user: &User,
    tickets: &[Ticket],
    users: &[User],
    loading: bool,
    spinner: &LoadingIndicator,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let subtitle = match user.role {
        Role::Admin => "Dashboard - system administrator",
        Role::Agent => "Dashboard - support agent",
        Role::Customer => "Dashboard - my support center",
    };
    let greeting = vec![
        Line::from(Span::styled(format!("Hello, {}", user.name), theme::title_style())),
        Line::from(Span::styled(subtitle, Style::default().fg(theme::MUTED))),
    ];
    frame.render_widget(Paragraph::new(greeting), chunks[0]);

    if loading && tickets.is_empty() {
        spinner.render(frame, chunks[1], "Loading dashboard...");
        return;
    }

    match user.role {
        Role::Admin => render_admin(frame, chunks[1], &admin_stats(tickets, users)),
        Role::Agent => render_personal(
            frame,
            chunks[1],
            "Tickets assigned to me",
            &agent_stats(tickets, user.id),
            None,
        ),
        Role::Customer => render_personal(
            frame,
            chunks[1],
            "My tickets",
            &customer_stats(tickets, user.id),
            Some("Press [n] to open a new ticket"),
        ),
    }
}

fn render_admin(frame: &mut Frame, area: Rect, stats: &AdminStats) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut left = vec![
        stat_line("Total tickets", stats.total),
        stat_line("Unassigned", stats.unassigned),
        Line::from(""),
    ];
    left.extend(status_lines(&stats.by_status));
    frame.render_widget(Paragraph::new(left).block(panel("Overview")), columns[0]);

    let right: Vec<Line> = if stats.workload.is_empty() {
        vec![Line::from(Span::styled(
            "No agents yet",
            Style::default().fg(theme::MUTED),
        ))]
    } else {
        stats
            .workload
            .iter()
            .map(|load| stat_line(&load.name, load.open))
            .collect()
    };
    frame.render_widget(
        Paragraph::new(right).block(panel("Open tickets per agent")),
        columns[1],
    );
}

fn render_personal(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    stats: &PersonalStats,
    footer: Option<&str>,
) {
    let mut lines = vec![stat_line(title, stats.mine), Line::from("")];
    if stats.by_status.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tickets yet",
            Style::default().fg(theme::MUTED),
        )));
    } else {
        lines.extend(status_lines(&stats.by_status));
    }
    if let Some(footer) = footer {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(footer, Style::default().fg(theme::ACCENT))));
    }
    frame.render_widget(Paragraph::new(lines).block(panel("Overview")), area);
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(theme::border_style(false))
}

fn stat_line(label: &str, value: usize) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<28}", label)),
        Span::styled(value.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn status_lines(counts: &[StatusCount]) -> Vec<Line<'static>> {
    counts
        .iter()
        .map(|c| {
            Line::from(vec![
                Span::styled(
                    format!("  {:<26}", c.name),
                    Style::default().fg(theme::status_color(&c.name)),
                ),
                Span::raw(c.count.to_string()),
            ])
        })
        .collect()
}
