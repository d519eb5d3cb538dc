// Command-line interface and startup configuration
//
// Everything the process needs to talk to the model is resolved once here into
// an AppConfig and never changes afterwards.

use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing::debug;

use crate::ai::credentials::CredentialManager;
use crate::ai::gemini_client::{GEMINI_API_BASE, GEMINI_MODEL};

/// Genre Harvester - research a music genre and get a normalized creative brief
#[derive(Parser, Debug)]
#[command(name = "genre-harvester", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Gemini API key (falls back to API_KEY, then the OS keychain)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "GENRE_HARVESTER_MODEL", default_value = GEMINI_MODEL, global = true)]
    pub model: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "GENRE_HARVESTER_API_BASE", default_value = GEMINI_API_BASE, global = true)]
    pub api_base: String,

    /// Do not ask the model to ground its answer with Google Search
    #[arg(long, global = true)]
    pub no_web_search: bool,

    /// Abort a model call after this many seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive genre browser (default)
    Shell,

    /// Generate a single brief and print it
    Brief {
        /// Genre to research
        genre: String,

        /// Print the raw JSON record
        #[arg(long, conflicts_with = "copy")]
        json: bool,

        /// Print the plain-text brief used for copy/paste
        #[arg(long)]
        copy: bool,
    },

    /// List the genre catalog
    Genres {
        /// Case-insensitive substring filter
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Serve the local HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8385)]
        port: u16,
    },

    /// Manage the API key stored in the OS keychain
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Store a key
    Set { key: String },
    /// Report whether a key is stored
    Status,
    /// Remove the stored key
    Delete,
}

/// Immutable process-wide configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub web_search: bool,
    pub timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_key: None,
            model: GEMINI_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
            web_search: true,
            timeout: None,
        }
    }
}

impl AppConfig {
    /// Build the config from parsed arguments, resolving the API key
    pub fn from_args(args: &GlobalArgs) -> Self {
        AppConfig {
            api_key: resolve_api_key(args.api_key.clone()),
            model: args.model.clone(),
            api_base: args.api_base.clone(),
            web_search: !args.no_web_search,
            timeout: args.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Explicit/GEMINI_API_KEY, then API_KEY, then the keychain
fn resolve_api_key(explicit: Option<String>) -> Option<String> {
    if let Some(key) = non_empty(explicit) {
        debug!("Using API key from command line or GEMINI_API_KEY");
        return Some(key);
    }
    if let Some(key) = non_empty(std::env::var("API_KEY").ok()) {
        debug!("Using API key from API_KEY");
        return Some(key);
    }
    match CredentialManager::retrieve_api_key() {
        Ok(key) => non_empty(key),
        Err(e) => {
            debug!("Keychain lookup failed: {}", e);
            None
        }
    }
}
