// AI module for Gemini-backed genre briefs
//
// This module provides:
// - Gemini API client behind a transport trait
// - The fixed system instruction and user prompt
// - Brief extraction from free-form model output
// - Secure credential storage via OS keychain

pub mod brief;
pub mod credentials;
pub mod gemini_client;
pub mod requester;
pub mod system_prompt;

// Re-export commonly used types
pub use brief::GenreBrief;
pub use credentials::CredentialManager;
pub use gemini_client::{ContentRequest, GeminiClient, ModelTransport};
pub use requester::BriefRequester;
pub use system_prompt::SYSTEM_INSTRUCTION;
