// Interactive genre browser
//
// Line-oriented version of the genre sidebar and brief panel:
// list/filter the catalog, add a genre, select one to generate its brief,
// regenerate, and print the copy text or raw JSON.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::commands::{brief, genre, AppState};
use crate::error::CommandError;
use crate::render::render_brief;

const HELP: &str = "Commands:
  list [filter]        show genres (numbered), optionally filtered
  add <name>           add a genre and generate its brief
  select <name|number> generate the brief for a genre
  regenerate           generate the current genre's brief again
  copy                 print the brief as copy/paste text
  json                 print the brief as raw JSON
  help                 show this help
  quit                 exit";

/// One parsed shell line
#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    List(Option<String>),
    Add(String),
    Select(String),
    Regenerate,
    Copy,
    Json,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match word.to_lowercase().as_str() {
            "list" | "ls" => ShellCommand::List(arg),
            "add" => match arg {
                Some(name) => ShellCommand::Add(name),
                None => ShellCommand::Unknown("add needs a genre name".to_string()),
            },
            "select" | "s" => match arg {
                Some(name) => ShellCommand::Select(name),
                None => ShellCommand::Unknown("select needs a genre name or number".to_string()),
            },
            "regenerate" | "r" | "retry" => ShellCommand::Regenerate,
            "copy" => ShellCommand::Copy,
            "json" => ShellCommand::Json,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            _ => ShellCommand::Unknown(format!("unknown command: {}", word)),
        };
        Some(command)
    }
}

fn print_listing(listing: &[String]) {
    if listing.is_empty() {
        println!("No genres match.");
        return;
    }
    for (i, name) in listing.iter().enumerate() {
        println!("{:>3}. {}", i + 1, name);
    }
}

fn print_outcome(result: Result<crate::ai::GenreBrief, CommandError>) {
    match result {
        Ok(brief) => println!("\n{}\n", render_brief(&brief)),
        Err(e) => {
            println!("Something went wrong: {}", e);
            println!("Type `regenerate` to retry.");
        }
    }
}

async fn prompt(stdout: &mut tokio::io::Stdout) -> std::io::Result<()> {
    stdout.write_all(b"\n> ").await?;
    stdout.flush().await
}

async fn generate(state: &AppState, name: &str) {
    println!("Harvesting data for \"{}\"... (searching the web and normalizing the brief)", name);
    print_outcome(brief::generate_brief(state, name).await);
}

/// Run the shell on stdin/stdout until `quit` or EOF
pub async fn run_shell(state: &AppState) -> Result<(), CommandError> {
    println!("Genre Harvester - select a genre to begin, or add a new one.");
    println!("{}\n", HELP);

    // Numbers in `select` refer to the most recent listing
    let mut listing = genre::list_genres(state, None)?;
    print_listing(&listing);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        prompt(&mut stdout)
            .await
            .map_err(|e| CommandError::Internal(format!("Failed to write prompt: {}", e)))?;

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(CommandError::Internal(format!("Failed to read input: {}", e))),
        };

        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };

        match command {
            ShellCommand::List(filter) => {
                listing = genre::list_genres(state, filter.as_deref())?;
                print_listing(&listing);
            }
            ShellCommand::Add(name) => match genre::add_genre(state, &name) {
                Ok(added) => {
                    listing = genre::list_genres(state, None)?;
                    generate(state, &added).await;
                }
                Err(e) => println!("{}", e),
            },
            ShellCommand::Select(input) => match genre::resolve_selection(&listing, &input) {
                Some(name) => generate(state, &name).await,
                // Unlisted names are still researched as typed
                None if input.parse::<usize>().is_err() => generate(state, &input).await,
                None => println!("No genre numbered {} in the last listing.", input),
            },
            ShellCommand::Regenerate => {
                let selected = state.lock_session()?.selected().map(str::to_string);
                if let Some(name) = &selected {
                    println!("Regenerating \"{}\"...", name);
                }
                print_outcome(brief::regenerate_brief(state).await);
            }
            ShellCommand::Copy => match brief::copy_brief(state) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{}", e),
            },
            ShellCommand::Json => match brief::brief_json(state) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("{}", e),
            },
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => break,
            ShellCommand::Unknown(message) => println!("{} (type `help`)", message),
        }
    }

    Ok(())
}
