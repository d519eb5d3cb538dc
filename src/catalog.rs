// In-memory genre catalog
//
// Seeded with a fixed list; users can add names. Duplicates are detected
// case-insensitively and listings are sorted alphabetically.

use crate::error::CatalogError;

pub const SEED_GENRES: &[&str] = &[
    "Afrobeats",
    "Ambient",
    "Bedroom Pop",
    "Boom Bap",
    "Drill",
    "Drum and Bass",
    "Dubstep",
    "Emo",
    "Grunge",
    "House",
    "Hyperpop",
    "Indie Rock",
    "Jersey Club",
    "Lo-fi",
    "Phonk",
    "Pop Punk",
    "Shoegaze",
    "Synthwave",
    "Techno",
    "Trap",
];

#[derive(Debug, Clone)]
pub struct GenreCatalog {
    genres: Vec<String>,
}

impl Default for GenreCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase the first character, leave the rest alone
fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl GenreCatalog {
    pub fn new() -> Self {
        Self::with_genres(SEED_GENRES.iter().copied())
    }

    /// Catalog from an arbitrary list, dropping later duplicates
    pub fn with_genres<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = GenreCatalog { genres: Vec::new() };
        for genre in genres {
            let genre = genre.into();
            if catalog.find(&genre).is_none() {
                catalog.genres.push(genre);
            }
        }
        catalog
    }

    /// Genres in insertion order (newest additions first)
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    /// The stored spelling of a genre, matched case-insensitively
    pub fn find(&self, name: &str) -> Option<&str> {
        let needle = name.trim().to_lowercase();
        self.genres
            .iter()
            .find(|g| g.to_lowercase() == needle)
            .map(String::as_str)
    }

    /// Sorted listing, optionally filtered by a case-insensitive substring
    pub fn filtered(&self, filter: &str) -> Vec<String> {
        let needle = filter.to_lowercase();
        let mut matches: Vec<String> = self
            .genres
            .iter()
            .filter(|g| g.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        matches
    }

    /// Add a user-supplied genre. Returns the stored (capitalized) name.
    pub fn add(&mut self, name: &str) -> Result<String, CatalogError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::Empty);
        }
        if let Some(existing) = self.find(trimmed) {
            return Err(CatalogError::Duplicate(existing.to_string()));
        }

        let genre = capitalize_first(trimmed);
        self.genres.insert(0, genre.clone());
        Ok(genre)
    }
}
