// Modules
pub mod ai;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod session;
pub mod shell;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{brief, genre, settings, AppState};
use config::{AppConfig, Cli, Command, GlobalArgs, KeyAction};

/// Initialize logging to stderr. RUST_LOG wins over the CLI level.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},hyper=warn,reqwest=warn", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn build_state(global: &GlobalArgs) -> anyhow::Result<AppState> {
    let config = AppConfig::from_args(global);
    info!(
        model = %config.model,
        web_search = config.web_search,
        has_key = config.api_key.is_some(),
        "Configuration loaded"
    );
    AppState::from_config(config).context("Failed to initialize the Gemini client")
}

fn run_key_action(action: KeyAction) -> anyhow::Result<()> {
    match action {
        KeyAction::Set { key } => {
            settings::set_api_key(&key).map_err(anyhow::Error::msg)?;
            println!("API key stored in the OS keychain.");
        }
        KeyAction::Status => {
            let has_key = settings::get_api_key_status().map_err(anyhow::Error::msg)?;
            println!(
                "{}",
                if has_key {
                    "An API key is stored in the OS keychain."
                } else {
                    "No API key stored in the OS keychain."
                }
            );
        }
        KeyAction::Delete => {
            settings::delete_api_key().map_err(anyhow::Error::msg)?;
            println!("API key removed from the OS keychain.");
        }
    }
    Ok(())
}

/// Entry point shared by the binary
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli.global.log_level);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let state = build_state(&cli.global)?;
            shell::run_shell(&state).await?;
        }
        Command::Brief { genre, json, copy } => {
            let state = build_state(&cli.global)?;
            let generated = brief::generate_brief(&state, &genre).await?;
            if json {
                println!("{}", brief::brief_json(&state)?);
            } else if copy {
                println!("{}", brief::copy_brief(&state)?);
            } else {
                println!("{}", render::render_brief(&generated));
            }
        }
        Command::Genres { filter } => {
            let state = build_state(&cli.global)?;
            for name in genre::list_genres(&state, filter.as_deref())? {
                println!("{}", name);
            }
        }
        Command::Serve { host, port } => {
            let state = build_state(&cli.global)?;
            server::serve(state, &host, port)
                .await
                .map_err(anyhow::Error::msg)?;
        }
        Command::Key { action } => run_key_action(action)?,
    }

    Ok(())
}
