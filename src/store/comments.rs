//! Comments slice: the thread of the ticket being viewed.

use crate::api::types::Comment;

use super::Rejection;

/// Comment thread state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentsState {
    pub comments: Vec<Comment>,
    /// The ticket the loaded thread belongs to.
    pub ticket_id: Option<i64>,
    pub loading: bool,
    /// A new comment is being posted.
    pub submitting: bool,
    pub error: Option<String>,
}

/// Comment transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentsAction {
    FetchPending { ticket_id: i64 },
    FetchFulfilled { ticket_id: i64, comments: Vec<Comment> },
    FetchRejected { ticket_id: i64, rejection: Rejection },
    AddPending,
    AddFulfilled(Comment),
    AddRejected(Rejection),
    LoggedOut,
}

impl CommentsAction {
    pub fn label(&self) -> &'static str {
        match self {
            CommentsAction::FetchPending { .. } => "comments/fetch/pending",
            CommentsAction::FetchFulfilled { .. } => "comments/fetch/fulfilled",
            CommentsAction::FetchRejected { .. } => "comments/fetch/rejected",
            CommentsAction::AddPending => "comments/add/pending",
            CommentsAction::AddFulfilled(_) => "comments/add/fulfilled",
            CommentsAction::AddRejected(_) => "comments/add/rejected",
            CommentsAction::LoggedOut => "comments/logged_out",
        }
    }
}

impl CommentsState {
    pub fn reduce(&mut self, action: CommentsAction) {
        match action {
            CommentsAction::FetchPending { ticket_id } => {
                if self.ticket_id != Some(ticket_id) {
                    self.comments.clear();
                }
                self.ticket_id = Some(ticket_id);
                self.loading = true;
                self.error = None;
            }
            CommentsAction::FetchFulfilled {
                ticket_id,
                comments,
            } => {
                // A late response for a ticket we navigated away from.
                if self.ticket_id != Some(ticket_id) {
                    return;
                }
                self.loading = false;
                self.comments = comments;
            }
            CommentsAction::FetchRejected {
                ticket_id,
                rejection,
            } => {
                if self.ticket_id != Some(ticket_id) {
                    return;
                }
                self.loading = false;
                self.error = Some(rejection.message);
            }
            CommentsAction::AddPending => {
                self.submitting = true;
                self.error = None;
            }
            CommentsAction::AddFulfilled(comment) => {
                self.submitting = false;
                if self.ticket_id == Some(comment.ticket_id) {
                    self.comments.push(comment);
                }
            }
            CommentsAction::AddRejected(r) => {
                self.submitting = false;
                self.error = Some(r.message);
            }
            CommentsAction::LoggedOut => *self = Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures::comment;

    #[test]
    fn test_fetch_replaces_thread() {
        let mut state = CommentsState::default();
        state.reduce(CommentsAction::FetchPending { ticket_id: 4 });
        assert!(state.loading);

        state.reduce(CommentsAction::FetchFulfilled {
            ticket_id: 4,
            comments: vec![comment(1, 4, 7), comment(2, 4, 8)],
        });
        assert!(!state.loading);
        assert_eq!(state.comments.len(), 2);
        assert_eq!(state.ticket_id, Some(4));
    }

    #[test]
    fn test_add_appends() {
        let mut state = CommentsState::default();
        state.reduce(CommentsAction::FetchPending { ticket_id: 4 });
        state.reduce(CommentsAction::FetchFulfilled {
            ticket_id: 4,
            comments: vec![comment(1, 4, 7)],
        });

        state.reduce(CommentsAction::AddPending);
        assert!(state.submitting);
        state.reduce(CommentsAction::AddFulfilled(comment(2, 4, 8)));

        assert!(!state.submitting);
        assert_eq!(state.comments.len(), 2);
        assert_eq!(state.comments[1].id, 2);
    }

    #[test]
    fn test_switching_ticket_drops_old_thread() {
        let mut state = CommentsState::default();
        state.reduce(CommentsAction::FetchPending { ticket_id: 1 });
        state.reduce(CommentsAction::FetchFulfilled {
            ticket_id: 1,
            comments: vec![comment(1, 1, 7)],
        });

        state.reduce(CommentsAction::FetchPending { ticket_id: 2 });
        assert!(state.comments.is_empty());

        // The late ticket 1 response is ignored.
        state.reduce(CommentsAction::FetchFulfilled {
            ticket_id: 1,
            comments: vec![comment(5, 1, 7)],
        });
        assert!(state.comments.is_empty());
        assert!(state.loading);
    }

    #[test]
    fn test_add_rejected_sets_error() {
        let mut state = CommentsState::default();
        state.reduce(CommentsAction::AddPending);
        state.reduce(CommentsAction::AddRejected(Rejection::new("Too long", Some(400))));
        assert!(!state.submitting);
        assert_eq!(state.error.as_deref(), Some("Too long"));
    }
}
