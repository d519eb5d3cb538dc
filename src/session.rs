// UI session state machine
//
// Idle -> Loading on select; Loading -> Success | Failure on completion;
// Success | Failure -> Loading on regenerate; Loading -> Failure when the caller
// gives up on the request. Every request gets a ticket and
// only the newest ticket may complete, so a slow earlier request cannot
// overwrite a later selection.

use serde::Serialize;

use crate::ai::GenreBrief;
use crate::error::{BriefError, SessionError};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading { genre: String },
    Success { genre: String, brief: GenreBrief },
    Failure { genre: String, message: String },
}

/// Handle for one outstanding request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: u64,
    genre: String,
}

impl Ticket {
    pub fn genre(&self) -> &str {
        &self.genre
    }
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    selected: Option<String>,
    next_id: u64,
    current: Option<u64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            state: SessionState::Idle,
            selected: None,
            next_id: 0,
            current: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading { .. })
    }

    /// Brief of the last successful request, if that is the current state
    pub fn brief(&self) -> Option<&GenreBrief> {
        match &self.state {
            SessionState::Success { brief, .. } => Some(brief),
            _ => None,
        }
    }

    fn start(&mut self, genre: String) -> Ticket {
        self.next_id += 1;
        self.current = Some(self.next_id);
        self.selected = Some(genre.clone());
        self.state = SessionState::Loading {
            genre: genre.clone(),
        };
        Ticket {
            id: self.next_id,
            genre,
        }
    }

    /// Select a genre and start loading its brief. Supersedes any request in flight.
    pub fn select(&mut self, genre: impl Into<String>) -> Ticket {
        self.start(genre.into())
    }

    /// Re-issue the request for the selected genre
    pub fn regenerate(&mut self) -> Result<Ticket, SessionError> {
        if let SessionState::Loading { genre } = &self.state {
            return Err(SessionError::Busy(genre.clone()));
        }
        let genre = self.selected.clone().ok_or(SessionError::NothingSelected)?;
        Ok(self.start(genre))
    }

    /// Record the outcome of a request. Returns false if the ticket is stale.
    pub fn complete(&mut self, ticket: &Ticket, outcome: &Result<GenreBrief, BriefError>) -> bool {
        if self.current != Some(ticket.id) {
            return false;
        }
        self.current = None;
        self.state = match outcome {
            Ok(brief) => SessionState::Success {
                genre: ticket.genre.clone(),
                brief: brief.clone(),
            },
            Err(e) => SessionState::Failure {
                genre: ticket.genre.clone(),
                message: e.to_string(),
            },
        };
        true
    }

    /// Fail a ticket whose request will never complete. Returns false if the ticket is stale.
    pub fn abandon(&mut self, ticket: &Ticket) -> bool {
        if self.current != Some(ticket.id) {
            return false;
        }
        self.current = None;
        self.state = SessionState::Failure {
            genre: ticket.genre.clone(),
            message: SessionError::Cancelled(ticket.genre.clone()).to_string(),
        };
        true
    }
}
