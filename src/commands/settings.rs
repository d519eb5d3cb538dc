// Commands for API key management
// The key lives in the OS keychain; the running process keeps the key it
// resolved at startup, so changes apply to the next run.

use crate::ai::CredentialManager;

/// Store the Gemini API key
pub fn set_api_key(api_key: &str) -> Result<(), String> {
    if api_key.trim().is_empty() {
        return Err("API key cannot be empty".to_string());
    }
    CredentialManager::store_api_key(api_key)
}

/// Whether a key is stored in the keychain
pub fn get_api_key_status() -> Result<bool, String> {
    match CredentialManager::has_api_key() {
        Ok(has_key) => Ok(has_key),
        Err(e) => {
            tracing::warn!("Error checking API key status: {}", e);
            Ok(false)
        }
    }
}

/// Delete the stored API key
pub fn delete_api_key() -> Result<(), String> {
    CredentialManager::delete_api_key()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_rejected() {
        assert_eq!(set_api_key("  "), Err("API key cannot be empty".to_string()));
    }
}
