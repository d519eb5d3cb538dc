// Commands for generating and exporting genre briefs

use tracing::{debug, warn};

use super::AppState;
use crate::ai::GenreBrief;
use crate::error::{BriefError, CommandError, SessionError};
use crate::render::{format_brief_for_copy, format_brief_json};
use crate::session::{SessionState, Ticket};

/// Ticket whose request is in flight. If the future running it is dropped
/// before completion, the ticket is failed so the session leaves `Loading`.
struct PendingTicket<'a> {
    state: &'a AppState,
    ticket: Option<Ticket>,
}

impl PendingTicket<'_> {
    fn genre(&self) -> &str {
        self.ticket.as_ref().map(Ticket::genre).unwrap_or_default()
    }

    fn complete(mut self, outcome: &Result<GenreBrief, BriefError>) -> Result<bool, CommandError> {
        match self.ticket.take() {
            Some(ticket) => Ok(self.state.lock_session()?.complete(&ticket, outcome)),
            None => Ok(false),
        }
    }
}

impl Drop for PendingTicket<'_> {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        if let Ok(mut session) = self.state.lock_session() {
            if session.abandon(&ticket) {
                warn!(genre = ticket.genre(), "Brief request dropped before completion");
            }
        }
    }
}

/// Run the request behind a ticket and record the outcome in the session.
/// The session lock is never held across the model call.
async fn run_ticket(state: &AppState, ticket: Ticket) -> Result<GenreBrief, CommandError> {
    let pending = PendingTicket {
        state,
        ticket: Some(ticket),
    };
    let outcome = state.requester.generate_genre_brief(pending.genre()).await;

    let genre = pending.genre().to_string();
    if !pending.complete(&outcome)? {
        debug!(genre = %genre, "Dropping outcome of superseded request");
    }

    outcome.map_err(CommandError::from)
}

/// Select a genre and generate its brief
pub async fn generate_brief(state: &AppState, genre: &str) -> Result<GenreBrief, CommandError> {
    let genre = genre.trim();
    if genre.is_empty() {
        return Err(CommandError::EmptyGenre);
    }

    // Prefer the catalog's spelling when the genre is listed
    let genre = state
        .lock_catalog()?
        .find(genre)
        .map(str::to_string)
        .unwrap_or_else(|| genre.to_string());

    let ticket = state.lock_session()?.select(genre);
    run_ticket(state, ticket).await
}

/// Generate the selected genre's brief again
pub async fn regenerate_brief(state: &AppState) -> Result<GenreBrief, CommandError> {
    let ticket = state.lock_session()?.regenerate()?;
    run_ticket(state, ticket).await
}

/// Snapshot of the session state
pub fn current_session(state: &AppState) -> Result<SessionState, CommandError> {
    Ok(state.lock_session()?.state().clone())
}

fn current_brief(state: &AppState) -> Result<GenreBrief, CommandError> {
    state
        .lock_session()?
        .brief()
        .cloned()
        .ok_or(CommandError::Session(SessionError::NoBrief))
}

/// Current brief as copy/paste text
pub fn copy_brief(state: &AppState) -> Result<String, CommandError> {
    Ok(format_brief_for_copy(&current_brief(state)?))
}

/// Current brief as pretty JSON
pub fn brief_json(state: &AppState) -> Result<String, CommandError> {
    format_brief_json(&current_brief(state)?).map_err(CommandError::Internal)
}
