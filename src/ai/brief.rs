// Genre brief record and response normalization
//
// The model is told to answer with a bare JSON object but sometimes wraps it in
// prose or a markdown fence. We take everything from the first '{' to the last '}'
// and parse that strictly. Multiple JSON fragments in one response will be
// mis-extracted; that is accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::system_prompt::{brief_title, PROMPT_VERSION};
use crate::error::FormatError;

/// Normalized creative brief for one genre.
///
/// Only produced by parsing a model response, so there is no `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreBrief {
    pub title: String,
    pub genre_name: String,
    pub tagline: String,
    pub bpm: String,
    pub core_sound: String,
    pub vocal_style: String,
    pub mood: Vec<String>,
    pub artists: Vec<String>,
    pub overlaps_with: Vec<String>,
    pub prompt_version: String,
}

impl GenreBrief {
    /// Normalization rules the model was asked to follow but did not.
    /// Informational only; a brief with deviations is still returned.
    pub fn deviations(&self) -> Vec<String> {
        let mut found = Vec::new();

        if !(3..=6).contains(&self.mood.len()) {
            found.push(format!("expected 3-6 mood words, got {}", self.mood.len()));
        }
        if !(2..=4).contains(&self.artists.len()) {
            found.push(format!("expected 2-4 artists, got {}", self.artists.len()));
        }
        let expected_title = brief_title(&self.genre_name);
        if self.title != expected_title {
            found.push(format!("title {:?} does not match {:?}", self.title, expected_title));
        }
        if self.prompt_version != PROMPT_VERSION {
            found.push(format!("prompt_version is {:?}", self.prompt_version));
        }

        found
    }
}

/// Slice the outermost `{ ... }` out of the text.
fn object_span(text: &str) -> Result<&str, FormatError> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(FormatError::NoObjectFound),
    }
}

/// Extract the JSON object embedded in a model response
pub fn extract_json(text: &str) -> Result<Value, FormatError> {
    let slice = object_span(text)?;
    serde_json::from_str::<Value>(slice).map_err(FormatError::MalformedJson)
}

/// Extract and type a brief from a raw model response
pub fn parse_brief(text: &str) -> Result<GenreBrief, FormatError> {
    let value = extract_json(text)?;
    let brief: GenreBrief = serde_json::from_value(value).map_err(FormatError::UnexpectedShape)?;

    for deviation in brief.deviations() {
        warn!(genre = %brief.genre_name, "Brief deviates from normalization rules: {}", deviation);
    }

    Ok(brief)
}
