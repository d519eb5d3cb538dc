// Secure credential storage for the Gemini API key
//
// Uses OS-native secure storage:
// - macOS: Keychain
// - Windows: Credential Manager
// - Linux: Secret Service (GNOME/KDE)

use keyring::Entry;
use tracing::{debug, info, warn};

const SERVICE_NAME: &str = "com.genre-harvester.cli";
const API_KEY_NAME: &str = "gemini_api_key";

pub struct CredentialManager;

impl CredentialManager {
    /// Basic format check before a key is stored
    pub fn validate_api_key(key: &str) -> Result<(), String> {
        let key = key.trim();
        if key.is_empty() {
            return Err("API key cannot be empty".to_string());
        }
        if key.chars().any(char::is_whitespace) {
            return Err("API key must not contain whitespace".to_string());
        }
        // Google API keys are 39 characters
        if key.len() < 20 {
            return Err("API key appears too short. Please check and try again.".to_string());
        }
        if !key.starts_with("AIza") {
            warn!("API key does not look like a Google API key (expected 'AIza' prefix)");
        }
        Ok(())
    }

    /// Store the Gemini API key in the OS keychain
    pub fn store_api_key(key: &str) -> Result<(), String> {
        Self::validate_api_key(key)?;

        let entry = Entry::new(SERVICE_NAME, API_KEY_NAME)
            .map_err(|e| format!("Failed to access keychain: {}", e))?;

        entry
            .set_password(key.trim())
            .map_err(|e| format!("Failed to store API key: {}", e))?;

        info!("API key stored in keychain");
        Ok(())
    }

    /// Retrieve the Gemini API key from the OS keychain
    pub fn retrieve_api_key() -> Result<Option<String>, String> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_NAME)
            .map_err(|e| format!("Failed to access keychain: {}", e))?;

        match entry.get_password() {
            Ok(key) => {
                debug!("API key retrieved from keychain (length: {})", key.len());
                Ok(Some(key))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No API key found in keychain");
                Ok(None)
            }
            Err(e) => Err(format!("Failed to retrieve API key: {}", e)),
        }
    }

    /// Delete the Gemini API key from the OS keychain
    pub fn delete_api_key() -> Result<(), String> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_NAME)
            .map_err(|e| format!("Failed to access keychain: {}", e))?;

        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(format!("Failed to delete API key: {}", e)),
        }
    }

    /// Check if an API key is stored (without returning it)
    pub fn has_api_key() -> Result<bool, String> {
        Self::retrieve_api_key().map(|key| key.is_some())
    }
}
