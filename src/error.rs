// Error types for genre briefs
//
// ServiceError covers everything that goes wrong talking to the model service.
// FormatError covers everything that goes wrong turning its text into a brief.
// Both collapse into BriefError, which is what the UI surfaces see.

use thiserror::Error;

/// Message shown to the user whenever a response cannot be normalized
pub const INVALID_FORMAT_MESSAGE: &str =
    "The AI returned an invalid format. Please try regenerating.";

/// Failure of the model service call itself
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No API key configured. Set GEMINI_API_KEY or run `genre-harvester key set <key>`.")]
    MissingApiKey,

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Model returned no text content")]
    EmptyResponse,
}

/// Why a raw response could not be reduced to a brief
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("No valid JSON object found in the response.")]
    NoObjectFound,

    #[error("Malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("JSON does not have the brief shape: {0}")]
    UnexpectedShape(#[source] serde_json::Error),
}

/// Error returned by `generate_genre_brief`
#[derive(Error, Debug)]
pub enum BriefError {
    #[error(transparent)]
    ServiceCallFailure(#[from] ServiceError),

    #[error("{}", INVALID_FORMAT_MESSAGE)]
    InvalidResponseFormat {
        #[source]
        kind: FormatError,
        raw: String,
    },
}

impl BriefError {
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, BriefError::InvalidResponseFormat { .. })
    }

    /// Short machine-readable tag, used by the HTTP API
    pub fn kind(&self) -> &'static str {
        match self {
            BriefError::ServiceCallFailure(_) => "service_call_failure",
            BriefError::InvalidResponseFormat { .. } => "invalid_response_format",
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Genre name cannot be empty")]
    Empty,

    #[error("Genre already in catalog: {0}")]
    Duplicate(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("No genre selected")]
    NothingSelected,

    #[error("A brief for \"{0}\" is already being generated")]
    Busy(String),

    #[error("No brief has been generated yet")]
    NoBrief,

    #[error("The request for \"{0}\" was cancelled before it finished")]
    Cancelled(String),
}

/// Error returned by the command layer to the UI surfaces
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Genre name cannot be empty")]
    EmptyGenre,

    #[error(transparent)]
    Brief(#[from] BriefError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BriefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_hides_details() {
        let err = BriefError::InvalidResponseFormat {
            kind: FormatError::NoObjectFound,
            raw: "Sorry".to_string(),
        };
        assert_eq!(err.to_string(), INVALID_FORMAT_MESSAGE);
        assert!(err.is_invalid_format());
        assert_eq!(err.kind(), "invalid_response_format");
    }

    #[test]
    fn test_service_failure_is_verbatim() {
        let err = BriefError::from(ServiceError::Status {
            status: 403,
            body: "API key not valid".to_string(),
        });
        assert_eq!(err.to_string(), "API error 403: API key not valid");
        assert!(!err.is_invalid_format());
    }
}
