use clap::Parser;
use genre_harvester_lib::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    genre_harvester_lib::run(Cli::parse()).await
}
