mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    init, list, new, preview, set, show, watch, InitArgs, PreviewArgs, Session, SetArgs, ShowArgs,
};
use tracing_subscriber::EnvFilter;

/// Contractform CLI - learning contracts with background sync
#[derive(Parser, Debug)]
#[command(name = "contractform")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Act as this identity instead of the configured owner
    #[arg(long, global = true)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a contractform.config.json
    Init(InitArgs),

    /// List contracts, most recently modified first
    List,

    /// Create a blank contract
    New,

    /// Print one contract
    Show(ShowArgs),

    /// Change one field of a contract
    Set(SetArgs),

    /// Print the renderer URL for a contract
    Preview(PreviewArgs),

    /// Poll the store and print changes until interrupted
    Watch,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()
        .context("Cannot get current directory")?
        .display()
        .to_string();

    if let Command::Init(args) = cli.command {
        return init(args, cli.owner, &cwd);
    }

    let session = Session::open(&cwd, cli.owner).await?;
    match cli.command {
        Command::Init(_) => Ok(()),
        Command::List => list(&session),
        Command::New => new(&session).await,
        Command::Show(args) => show(args, &session).await,
        Command::Set(args) => set(args, &session).await,
        Command::Preview(args) => preview(args, &session).await,
        Command::Watch => watch(&session).await,
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
