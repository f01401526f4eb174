use anyhow::Result;
use clap::{Parser, Subcommand};
use codeshare_backend::config::CodeshareConfig;
use codeshare_backend::node::CodeshareNode;
use codeshare_backend::telemetry;
use codeshare_backend::utils;

#[derive(Parser)]
#[command(author, version, about = "Codeshare backend daemon")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for REST/API access
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    utils::print_banner();
    telemetry::init_tracing();

    let args = Args::parse();

    let config = CodeshareConfig::from_env()?;
    let node = CodeshareNode::start(config)?;
    tracing::info!("bootstrap complete");

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => node.run_http_server().await,
    }
}
