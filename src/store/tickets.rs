//! Tickets slice: the ticket list, the selected ticket, and the status and
//! priority lookup tables.

use crate::api::types::{Ticket, TicketPriority, TicketStatus};

use super::Rejection;

/// Ticket state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketsState {
    pub tickets: Vec<Ticket>,
    pub selected_ticket: Option<Ticket>,
    pub statuses: Vec<TicketStatus>,
    pub priorities: Vec<TicketPriority>,
    /// List fetch, create, or single-ticket fetch in flight.
    pub loading: bool,
    /// A ticket update is in flight.
    pub update_loading: bool,
    pub status_loading: bool,
    pub priority_loading: bool,
    pub error: Option<String>,
}

/// Ticket transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketsAction {
    FetchPending,
    FetchFulfilled(Vec<Ticket>),
    FetchRejected(Rejection),

    CreatePending,
    CreateFulfilled(Ticket),
    CreateRejected(Rejection),

    FetchOnePending,
    FetchOneFulfilled(Ticket),
    FetchOneRejected(Rejection),

    UpdatePending,
    UpdateFulfilled(Ticket),
    UpdateRejected(Rejection),

    StatusesPending,
    StatusesFulfilled(Vec<TicketStatus>),
    StatusesRejected(Rejection),

    PrioritiesPending,
    PrioritiesFulfilled(Vec<TicketPriority>),
    PrioritiesRejected(Rejection),

    ClearError,
    LoggedOut,
}

impl TicketsAction {
    pub fn label(&self) -> &'static str {
        use TicketsAction::*;
        match self {
            FetchPending => "tickets/fetch/pending",
            FetchFulfilled(_) => "tickets/fetch/fulfilled",
            FetchRejected(_) => "tickets/fetch/rejected",
            CreatePending => "tickets/create/pending",
            CreateFulfilled(_) => "tickets/create/fulfilled",
            CreateRejected(_) => "tickets/create/rejected",
            FetchOnePending => "tickets/fetch_one/pending",
            FetchOneFulfilled(_) => "tickets/fetch_one/fulfilled",
            FetchOneRejected(_) => "tickets/fetch_one/rejected",
            UpdatePending => "tickets/update/pending",
            UpdateFulfilled(_) => "tickets/update/fulfilled",
            UpdateRejected(_) => "tickets/update/rejected",
            StatusesPending => "tickets/statuses/pending",
            StatusesFulfilled(_) => "tickets/statuses/fulfilled",
            StatusesRejected(_) => "tickets/statuses/rejected",
            PrioritiesPending => "tickets/priorities/pending",
            PrioritiesFulfilled(_) => "tickets/priorities/fulfilled",
            PrioritiesRejected(_) => "tickets/priorities/rejected",
            ClearError => "tickets/clear_error",
            LoggedOut => "tickets/logged_out",
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        use TicketsAction::*;
        match self {
            FetchRejected(r) | CreateRejected(r) | FetchOneRejected(r) | UpdateRejected(r)
            | StatusesRejected(r) | PrioritiesRejected(r) => Some(r),
            _ => None,
        }
    }
}

impl TicketsState {
    /// Find a ticket in the list by id.
    pub fn find(&self, id: i64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn reduce(&mut self, action: TicketsAction) {
        use TicketsAction::*;
        match action {
            FetchPending | CreatePending | FetchOnePending => {
                self.loading = true;
                self.error = None;
            }
            FetchFulfilled(tickets) => {
                self.loading = false;
                self.tickets = tickets;
            }
            CreateFulfilled(ticket) => {
                self.loading = false;
                self.tickets.push(ticket);
            }
            FetchOneFulfilled(ticket) => {
                self.loading = false;
                self.selected_ticket = Some(ticket);
            }
            FetchRejected(r) | CreateRejected(r) | FetchOneRejected(r) => {
                self.loading = false;
                self.error = Some(r.message);
            }

            UpdatePending => {
                self.update_loading = true;
                self.error = None;
            }
            UpdateFulfilled(ticket) => {
                self.update_loading = false;
                if let Some(slot) = self.tickets.iter_mut().find(|t| t.id == ticket.id) {
                    *slot = ticket.clone();
                }
                self.selected_ticket = Some(ticket);
            }
            UpdateRejected(r) => {
                self.update_loading = false;
                self.error = Some(r.message);
            }

            StatusesPending => {
                self.status_loading = true;
                self.error = None;
            }
            StatusesFulfilled(statuses) => {
                self.status_loading = false;
                self.statuses = statuses;
            }
            StatusesRejected(r) => {
                self.status_loading = false;
                self.error = Some(r.message);
            }

            PrioritiesPending => {
                self.priority_loading = true;
                self.error = None;
            }
            PrioritiesFulfilled(priorities) => {
                self.priority_loading = false;
                self.priorities = priorities;
            }
            PrioritiesRejected(r) => {
                self.priority_loading = false;
                self.error = Some(r.message);
            }

            ClearError => self.error = None,
            // Lookup tables survive; requests in flight are forgotten.
            LoggedOut => {
                self.tickets.clear();
                self.selected_ticket = None;
                self.error = None;
                self.loading = false;
                self.update_loading = false;
                self.status_loading = false;
                self.priority_loading = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures::ticket;

    fn with_list(ids: &[i64]) -> TicketsState {
        let mut state = TicketsState::default();
        state.reduce(TicketsAction::FetchFulfilled(
            ids.iter().map(|id| ticket(*id, "T")).collect(),
        ));
        state
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut state = TicketsState {
            error: Some("stale".to_string()),
            ..Default::default()
        };

        state.reduce(TicketsAction::FetchPending);
        assert!(state.loading);
        assert!(state.error.is_none());

        state.reduce(TicketsAction::FetchFulfilled(vec![ticket(1, "A")]));
        assert!(!state.loading);
        assert_eq!(state.tickets.len(), 1);
    }

    #[test]
    fn test_fetch_replaces_list() {
        let mut state = with_list(&[1, 2, 3]);
        state.reduce(TicketsAction::FetchFulfilled(vec![ticket(9, "N")]));
        assert_eq!(state.tickets.len(), 1);
        assert_eq!(state.tickets[0].id, 9);
    }

    #[test]
    fn test_create_appends_exactly_one() {
        let mut state = with_list(&[1, 2]);
        state.reduce(TicketsAction::CreatePending);
        state.reduce(TicketsAction::CreateFulfilled(ticket(3, "New")));

        assert_eq!(state.tickets.len(), 3);
        assert_eq!(state.tickets[2], ticket(3, "New"));
        assert!(!state.loading);
    }

    #[test]
    fn test_update_merges_matching_entry_and_selection() {
        let mut state = with_list(&[1, 2, 3]);
        state.reduce(TicketsAction::FetchOneFulfilled(ticket(2, "T")));
        let untouched = state.tickets.clone();

        let mut updated = ticket(2, "T");
        updated.status_id = Some(3);
        updated.status_name = Some("Resolved".to_string());

        state.reduce(TicketsAction::UpdatePending);
        assert!(state.update_loading);
        assert!(!state.loading);

        state.reduce(TicketsAction::UpdateFulfilled(updated.clone()));

        assert!(!state.update_loading);
        assert_eq!(state.selected_ticket.as_ref(), Some(&updated));
        assert_eq!(state.find(2), Some(&updated));
        assert_eq!(state.tickets[0], untouched[0]);
        assert_eq!(state.tickets[2], untouched[2]);
    }

    #[test]
    fn test_update_of_unlisted_ticket_only_sets_selection() {
        let mut state = with_list(&[1]);
        state.reduce(TicketsAction::UpdateFulfilled(ticket(5, "Other")));
        assert_eq!(state.tickets.len(), 1);
        assert_eq!(state.selected_ticket.as_ref().map(|t| t.id), Some(5));
    }

    #[test]
    fn test_rejected_update_leaves_entities() {
        let mut state = with_list(&[1]);
        let before = state.tickets.clone();
        state.reduce(TicketsAction::UpdatePending);
        state.reduce(TicketsAction::UpdateRejected(Rejection::new("Denied", Some(403))));

        assert_eq!(state.tickets, before);
        assert!(!state.update_loading);
        assert_eq!(state.error.as_deref(), Some("Denied"));
    }

    #[test]
    fn test_lookup_flags_are_independent() {
        let mut state = TicketsState::default();
        state.reduce(TicketsAction::StatusesPending);
        state.reduce(TicketsAction::PrioritiesPending);
        assert!(state.status_loading);
        assert!(state.priority_loading);
        assert!(!state.loading);

        state.reduce(TicketsAction::StatusesFulfilled(vec![TicketStatus {
            id: 1,
            name: "Open".to_string(),
        }]));
        assert!(!state.status_loading);
        assert!(state.priority_loading);

        state.reduce(TicketsAction::PrioritiesRejected(Rejection::new("x", None)));
        assert!(!state.priority_loading);
        assert_eq!(state.error.as_deref(), Some("x"));
    }

    #[test]
    fn test_clear_error() {
        let mut state = TicketsState::default();
        state.reduce(TicketsAction::FetchRejected(Rejection::new("boom", Some(500))));
        state.reduce(TicketsAction::ClearError);
        assert!(state.error.is_none());
    }
}
