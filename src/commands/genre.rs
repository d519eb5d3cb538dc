// Commands for the genre catalog

use tracing::info;

use super::AppState;
use crate::error::CommandError;

/// Sorted genre names, optionally filtered by substring
pub fn list_genres(state: &AppState, filter: Option<&str>) -> Result<Vec<String>, CommandError> {
    Ok(state.lock_catalog()?.filtered(filter.unwrap_or("")))
}

/// Add a genre to the catalog and return the stored name
pub fn add_genre(state: &AppState, name: &str) -> Result<String, CommandError> {
    let added = state.lock_catalog()?.add(name)?;
    info!(genre = %added, "Genre added to catalog");
    Ok(added)
}

/// Resolve a shell selection: a 1-based index into `listing`, or a name
pub fn resolve_selection(listing: &[String], input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(index) = input.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| listing.get(i))
            .cloned();
    }
    let needle = input.to_lowercase();
    listing.iter().find(|g| g.to_lowercase() == needle).cloned()
}
