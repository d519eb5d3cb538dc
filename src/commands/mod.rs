// Command modules shared by the shell, the one-shot CLI and the HTTP API

pub mod brief;
pub mod genre;
pub mod settings;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::ai::{BriefRequester, GeminiClient, ModelTransport};
use crate::catalog::GenreCatalog;
use crate::config::AppConfig;
use crate::error::{CommandError, ServiceError};
use crate::session::Session;

/// State shared by every surface for the lifetime of the process
pub struct AppState {
    pub config: AppConfig,
    pub requester: BriefRequester,
    pub catalog: Mutex<GenreCatalog>,
    pub session: Mutex<Session>,
}

impl AppState {
    /// State backed by any transport (tests use a mock)
    pub fn new(config: AppConfig, transport: Arc<dyn ModelTransport>) -> Self {
        let requester = BriefRequester::new(transport, &config);
        AppState {
            config,
            requester,
            catalog: Mutex::new(GenreCatalog::new()),
            session: Mutex::new(Session::new()),
        }
    }

    /// State backed by the real Gemini client
    pub fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let client = GeminiClient::new(config.api_key.clone(), &config.api_base, config.timeout)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub(crate) fn lock_catalog(&self) -> Result<MutexGuard<'_, GenreCatalog>, CommandError> {
        self.catalog
            .lock()
            .map_err(|e| CommandError::Internal(format!("Catalog lock failed: {}", e)))
    }

    pub(crate) fn lock_session(&self) -> Result<MutexGuard<'_, Session>, CommandError> {
        self.session
            .lock()
            .map_err(|e| CommandError::Internal(format!("Session lock failed: {}", e)))
    }
}
