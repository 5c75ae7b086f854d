//! Key binding hints.
//!
//! Each screen has a context that decides which hints appear in the footer
//! help bar. The help screen lists the full bindings per section.

/// The input context the user is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Login,
    Register,
    Dashboard,
    TicketList,
    TicketDetail,
    CommentComposer,
    CreateTicket,
    Users,
    UserForm,
    Picker,
    Confirm,
    Help,
    NotFound,
}

/// Footer hints for a context, in `[key] description` form.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Login => {
            "[Tab] next field  [Enter] sign in  [Ctrl+R] create account  [Ctrl+C] quit"
        }
        KeyContext::Register => {
            "[Tab] next field  [Enter] sign up  [Ctrl+R] back to sign in  [Ctrl+C] quit"
        }
        KeyContext::Dashboard => "[t] tickets  [n] new ticket  [u] users  [r] refresh  [L] logout  [?] help  [q] quit",
        KeyContext::TicketList => {
            "[j/k] navigate  [Enter] open  [n] new ticket  [r] refresh  [d] dashboard  [?] help"
        }
        KeyContext::TicketDetail => {
            "[s] status  [p] priority  [a] assign  [c] comment  [j/k] scroll  [Esc] back  [?] help"
        }
        KeyContext::CommentComposer => "[Ctrl+S] post comment  [Esc] cancel",
        KeyContext::CreateTicket => "[Tab] next field  [Ctrl+S] create  [Esc] cancel",
        KeyContext::Users => "[j/k] navigate  [c] create user  [r] refresh  [d] dashboard  [?] help",
        KeyContext::UserForm => "[Tab] next field  [←/→] role  [Ctrl+S] create  [Esc] cancel",
        KeyContext::Picker => "[j/k] navigate  [Enter] select  [Esc] cancel",
        KeyContext::Confirm => "[y] confirm  [n/Esc] cancel",
        KeyContext::Help => "[Esc/?] close help",
        KeyContext::NotFound => "[d] dashboard  [t] tickets  [?] help",
    }
}

/// A titled group of bindings shown on the help screen.
pub struct HelpSection {
    pub title: &'static str,
    pub bindings: &'static [(&'static str, &'static str)],
}

/// Full key binding reference.
pub const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Global",
        bindings: &[
            ("Ctrl+C", "Quit"),
            ("q", "Quit (outside text fields)"),
            ("?", "Toggle this help"),
            ("d", "Dashboard"),
            ("t", "Ticket list"),
            ("n", "New ticket (customers)"),
            ("u", "Users (admins)"),
            ("L", "Log out"),
        ],
    },
    HelpSection {
        title: "Sign in / Sign up",
        bindings: &[
            ("Tab / Shift+Tab", "Move between fields"),
            ("Enter", "Submit"),
            ("Ctrl+R", "Switch between sign in and sign up"),
            ("Esc", "Back to the dashboard when already signed in"),
        ],
    },
    HelpSection {
        title: "Ticket list",
        bindings: &[
            ("j / k", "Move selection"),
            ("g / G", "First / last ticket"),
            ("Enter", "Open ticket"),
            ("r", "Refresh"),
        ],
    },
    HelpSection {
        title: "Ticket detail",
        bindings: &[
            ("s", "Change status (admins and agents)"),
            ("p", "Change priority (admins)"),
            ("a", "Assign to agent (admins)"),
            ("c", "Write a comment (customers and agents)"),
            ("Ctrl+S", "Post comment"),
            ("j / k", "Scroll comments"),
            ("r", "Reload ticket and comments"),
            ("Esc", "Back to ticket list"),
        ],
    },
    HelpSection {
        title: "Forms",
        bindings: &[
            ("Tab / Shift+Tab", "Move between fields"),
            ("← / →", "Change role (create user)"),
            ("Ctrl+S", "Submit"),
            ("Esc", "Cancel"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_context_has_hints() {
        let contexts = [
            KeyContext::Login,
            KeyContext::Register,
            KeyContext::Dashboard,
            KeyContext::TicketList,
            KeyContext::TicketDetail,
            KeyContext::CommentComposer,
            KeyContext::CreateTicket,
            KeyContext::Users,
            KeyContext::UserForm,
            KeyContext::Picker,
            KeyContext::Confirm,
            KeyContext::Help,
            KeyContext::NotFound,
        ];
        for context in contexts {
            let hints = get_context_hints(context);
            assert!(hints.starts_with('['), "{:?}", context);
        }
    }

    #[test]
    fn test_composer_hints_mention_submit() {
        assert!(get_context_hints(KeyContext::CommentComposer).contains("Ctrl+S"));
    }

    #[test]
    fn test_help_sections_not_empty() {
        assert!(HELP_SECTIONS.iter().all(|s| !s.bindings.is_empty()));
    }
}
